//! Structural CBOR codec driven by serde's data model.
//!
//! Any type implementing `Serialize`/`Deserialize` can be written to and
//! read from CBOR without carrying encoding logic of its own. The wire form
//! uses indefinite-length framing throughout:
//!
//! - records: `0xbf`, then `name, value` pairs, then `0xff`
//! - sequences and maps: `0x9f`, then elements (maps: key then value), then
//!   `0xff`
//! - floats: always fixed width (`0xfa` for f32, `0xfb` for f64)
//!
//! Null is the only absence marker: `Some(())` and `Some(None)` are written
//! as `0xf6` and decode as `None`.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Simple {
//!     a: String,
//! }
//!
//! let value = Simple { a: "str".into() };
//! assert_eq!(sercbor::dump_hex(&value).unwrap(), "bf616163737472ff");
//! assert_eq!(sercbor::load_hex::<Simple>("bf616163737472ff").unwrap(), value);
//! ```

pub mod cbor;
pub mod config;
pub mod de;
pub mod frame;
pub mod ser;

pub use cbor::{
    dump, dump_hex, dump_to_writer, load, load_from_reader, load_hex, load_with, CborError,
    Result,
};
pub use config::DecodeConfig;
pub use de::Deserializer;
pub use frame::{Kind, Role};
pub use ser::Serializer;
