//! CBOR constants.

// MAJOR type values (bits 7-5 of the initial byte)
pub const MAJOR_UIN: u8 = 0b000;
pub const MAJOR_NIN: u8 = 0b001;
pub const MAJOR_STR: u8 = 0b011;

// MAJOR type overlays (major shifted to bits 7-5)
pub const OVERLAY_UIN: u8 = 0b000_00000;
pub const OVERLAY_NIN: u8 = 0b001_00000;

pub const MINOR_MASK: u8 = 0b11111;

// Minor values announcing 1, 2, 4 and 8 trailing bytes.
pub const MINOR_U8: u8 = 24;
pub const MINOR_U16: u8 = 25;
pub const MINOR_U32: u8 = 26;
pub const MINOR_U64: u8 = 27;

/// Largest value stored directly in the minor bits.
pub const MAX_INLINE: u64 = 23;

pub const CBOR_FALSE: u8 = 0xf4;
pub const CBOR_TRUE: u8 = 0xf5;
pub const CBOR_NULL: u8 = 0xf6;
pub const CBOR_F32: u8 = 0xfa;
pub const CBOR_F64: u8 = 0xfb;

/// Indefinite-length array start.
pub const CBOR_START_ARR: u8 = 0x9f;
/// Indefinite-length map start.
pub const CBOR_START_MAP: u8 = 0xbf;
/// CBOR "break" stop code.
pub const CBOR_END: u8 = 0xff;

/// Returns the major type of a header byte.
#[inline]
pub fn major_of(header: u8) -> u8 {
    header >> 5
}

/// Returns the number of bytes following a header with the given minor value,
/// or `None` if the minor value is not an integer length marker.
#[inline]
pub fn trailing_len(minor: u8) -> Option<usize> {
    match minor {
        0..=23 => Some(0),
        MINOR_U8 => Some(1),
        MINOR_U16 => Some(2),
        MINOR_U32 => Some(4),
        MINOR_U64 => Some(8),
        _ => None,
    }
}
