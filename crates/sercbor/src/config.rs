//! Decoding configuration.

use serde::{Deserialize, Serialize};

/// Nesting depth accepted by [`DecodeConfig::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for [`crate::load_with`] and [`crate::Deserializer::with_config`].
///
/// Derives serde so it can live inside an application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Accept bytes after the root item instead of failing with
    /// [`crate::CborError::TrailingBytes`].
    pub allow_trailing_bytes: bool,
    /// Maximum number of nested arrays/maps.
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            allow_trailing_bytes: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    pub fn allow_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
