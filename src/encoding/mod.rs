//! # Encoding Module
//!
//! Primitive byte-level codecs shared by every layer of the crate:
//!
//! - **Varint encoding**: little-endian base-128 integers with a per-byte
//!   continuation bit, bounded by the target width on decode
//!
//! Fixed-width encodings (floats, the legacy scalar layout) live with the
//! cursor types in [`crate::records`], which own the buffer bookkeeping.

pub mod varint;

pub use varint::{
    decode_varint, decode_varint_for_width, encode_varint, max_varint_len, varint_len,
    MAX_VARINT_LEN,
};
