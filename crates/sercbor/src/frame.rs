//! Traversal roles shared by the structural writer and reader.
//!
//! Each composite value opens one frame whose [`Role`] is chosen from the
//! value's [`Kind`]. The role alone decides the framing bytes and whether
//! element names travel on the wire.

use std::fmt;

use crate::cbor::constants::{CBOR_END, CBOR_START_ARR, CBOR_START_MAP};

/// Shape of a value as reported by its `Serialize`/`Deserialize` impl.
///
/// serde reports sets as plain sequences and never opens a frame for a
/// scalar, so the codec itself only constructs the other kinds. [`Kind::Set`]
/// and [`Kind::Primitive`] complete the kind model for callers mapping their
/// own schema descriptions onto roles with [`Role::for_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Record,
    List,
    Set,
    Map,
    MapEntry,
    Enum,
    Primitive,
}

/// Framing strategy of one nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `0xbf`, then `name, value` pairs, then break.
    Record,
    /// `0x9f`, then values, then break.
    List,
    /// Same framing as [`Role::List`]; entries are written as [`Role::Entry`].
    Map,
    /// A bare key followed by its value, no framing at all.
    Entry,
}

impl Role {
    /// Picks the role for a composite value. Kinds without a dedicated role
    /// fall back to [`Role::Record`].
    pub fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::List | Kind::Set => Role::List,
            Kind::Map => Role::Map,
            Kind::MapEntry => Role::Entry,
            Kind::Record | Kind::Enum | Kind::Primitive => Role::Record,
        }
    }

    pub fn begin_token(self) -> Option<u8> {
        match self {
            Role::Record => Some(CBOR_START_MAP),
            Role::List | Role::Map => Some(CBOR_START_ARR),
            Role::Entry => None,
        }
    }

    pub fn end_token(self) -> Option<u8> {
        match self {
            Role::Record | Role::List | Role::Map => Some(CBOR_END),
            Role::Entry => None,
        }
    }

    /// Whether each element is preceded by its name as a text string.
    pub fn writes_names(self) -> bool {
        self == Role::Record
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Record => "record",
            Role::List => "list",
            Role::Map => "map",
            Role::Entry => "entry",
        })
    }
}

/// Element cursor of a map entry: slot 0 is the key, slot 1 the value.
#[derive(Debug, Default)]
pub(crate) struct EntrySlots {
    next: usize,
}

impl EntrySlots {
    /// A cursor with both slots already taken.
    pub(crate) fn closed() -> Self {
        Self { next: 2 }
    }

    /// Returns the next slot index, or `None` once key and value are done.
    pub(crate) fn next_slot(&mut self) -> Option<usize> {
        let slot = self.next;
        if slot < 2 {
            self.next += 1;
            Some(slot)
        } else {
            None
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.next >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_by_kind() {
        assert_eq!(Role::for_kind(Kind::Record), Role::Record);
        assert_eq!(Role::for_kind(Kind::List), Role::List);
        assert_eq!(Role::for_kind(Kind::Set), Role::List);
        assert_eq!(Role::for_kind(Kind::Map), Role::Map);
        assert_eq!(Role::for_kind(Kind::MapEntry), Role::Entry);
        assert_eq!(Role::for_kind(Kind::Enum), Role::Record);
    }

    #[test]
    fn tokens() {
        assert_eq!(Role::Record.begin_token(), Some(0xbf));
        assert_eq!(Role::List.begin_token(), Some(0x9f));
        assert_eq!(Role::Map.begin_token(), Some(0x9f));
        assert_eq!(Role::Entry.begin_token(), None);
        assert_eq!(Role::Entry.end_token(), None);
        assert_eq!(Role::Map.end_token(), Some(0xff));
        assert!(Role::Record.writes_names());
        assert!(!Role::Map.writes_names());
    }

    #[test]
    fn entry_slots() {
        let mut slots = EntrySlots::default();
        assert_eq!(slots.next_slot(), Some(0));
        assert!(!slots.is_done());
        assert_eq!(slots.next_slot(), Some(1));
        assert!(slots.is_done());
        assert_eq!(slots.next_slot(), None);

        let mut closed = EntrySlots::closed();
        assert!(closed.is_done());
        assert_eq!(closed.next_slot(), None);
    }

    #[test]
    fn scalar_kind_falls_back_to_record() {
        assert_eq!(Role::for_kind(Kind::Primitive), Role::Record);
    }
}
