//! # Record Serialization
//!
//! The record engine: a self-describing binary format for structured values
//! with schema evolution and zero-copy reads.
//!
//! ## Record Binary Layout (versioned, format v2)
//!
//! ```text
//! +--------+----------------+-----+----------------+-----------+-------------+
//! | "ZCRT" | format_version | tag | schema_version | data_size | fingerprint |
//! | 4 B    | varint = 2     | 1 B | varint         | varint    | varint      |
//! +--------+----------------+-----+----------------+-----------+-------------+
//! | body: payload of `tag`                                                   |
//! +--------------------------------------------------------------------------+
//! ```
//!
//! A struct body is a varint field count followed by one entry per field:
//!
//! ```text
//! +----------+------------+-----+----------------------+
//! | name_len | name bytes | tag | payload of `tag`     |
//! | varint   |            | 1 B |                      |
//! +----------+------------+-----+----------------------+
//! ```
//!
//! Integers are varints (signed values bit-reinterpreted at their width),
//! floats fixed-width little-endian, strings varint-length-prefixed bytes,
//! arrays a varint count plus one element tag byte plus untagged payloads.
//! Field order on the wire is the writing type's declaration order.
//!
//! The per-field name and tag are what buy evolution without a schema
//! side-channel: a reader skips entries it does not know (by tag alone),
//! fills fields the wire does not carry from schema defaults, and widens
//! integer/float payloads into wider targets.
//!
//! ## Legacy Layout (format v1)
//!
//! An 11-byte fixed header (magic, u16 version, tag, u32 body size) over a
//! positional fixed-width body; no per-field names, no defaults, no
//! skipping. Retained for compatibility with pre-schema records.
//!
//! ## Module Structure
//!
//! - `types`: the single-byte [`TypeTag`] vocabulary and widening lattice
//! - `header`: both header layouts and the unified parse
//! - `encode` / `decode`: cursor-threaded primitives over caller buffers
//! - `codec`: the [`Wire`] trait binding in-memory types to the format
//! - `writer` / `reader`: the framed entry points
//! - `view`: zero-copy access and multi-record iteration
//! - `limits`: hardening bounds for adversarial input

pub mod codec;
pub mod decode;
pub mod encode;
pub mod header;
pub mod limits;
pub mod reader;
pub mod types;
pub mod view;
pub mod writer;


pub use codec::{ByteString, Wire};
pub use decode::{Decoder, StructDecoder};
pub use encode::{Encoder, StructEncoder, WireFormat};
pub use header::{RecordHeader, FORMAT_V1, FORMAT_V2, MAGIC};
pub use limits::{MAX_NESTING_DEPTH, MAX_PREALLOC_ELEMENTS};
pub use reader::{read, read_v1};
pub use types::TypeTag;
pub use view::{FieldAccess, FieldAccessor, PlainValue, RecordIter, RecordView};
pub use writer::{write, write_v1};
