//! # zercord - Zero-Copy Record Serialization
//!
//! `zercord` turns in-memory values of a statically known shape into a
//! self-describing byte stream and back, using a schema descriptor to
//! reconcile differences between the shape that wrote the bytes and the
//! shape that reads them. This implementation prioritizes:
//!
//! - **Caller-owned buffers**: the engine never allocates the output and
//!   borrows the input; the only deserialization allocations are the owned
//!   arrays handed back to the caller
//! - **Evolution without a registry**: per-field names and type tags on the
//!   wire make skip-unknown, default fill, and width widening possible with
//!   nothing but the bytes and a local schema
//! - **Zero-copy reads**: views return borrowed slices into the source
//!   buffer, including straight out of a memory-mapped file
//!
//! ## Quick Start
//!
//! ```ignore
//! use zercord::{read, write, FieldDefinition, Schema, TypeTag};
//!
//! let schema = Schema::new("person", 1)
//!     .with_field(FieldDefinition::new("id", TypeTag::U32))
//!     .with_field(FieldDefinition::new("name", TypeTag::String));
//!
//! let mut buf = [0u8; 256];
//! let written = write(&person, &mut buf, &schema)?;
//! let back: Person = read(&buf[..written], &schema)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Entry Points (write / read / views)    │
//! ├─────────────────────────────────────────┤
//! │ Schema & Validator │ Zero-Copy View Layer│
//! ├────────────────────┼────────────────────┤
//! │        Wire Trait (typed codec)          │
//! ├─────────────────────────────────────────┤
//! │   Encoder / Decoder (cursor discipline)  │
//! ├─────────────────────────────────────────┤
//! │   Headers, Type Tags, Varint Primitives  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Two wire formats share the `ZCRT` magic: the versioned format (v2) with
//! varint framing and name-tagged struct fields, and a legacy fixed-width
//! positional format (v1) retained for pre-schema records. Writers choose
//! the format by entry point; the unified reader accepts both.
//!
//! ## Concurrency
//!
//! Every operation runs to completion on the calling thread with no shared
//! mutable state. Distinct buffers may be processed from distinct threads
//! without synchronization; a writer exclusively borrows its output buffer
//! for the duration of a write.
//!
//! ## Module Overview
//!
//! - [`records`]: wire format, typed codec, framed writer/reader, views
//! - [`schema`]: schema model, validator, compatibility analysis
//! - [`storage`]: read-only memory-mapped input files
//! - [`encoding`]: varint primitives
//! - [`error`]: the closed error taxonomy

pub mod encoding;
pub mod error;
pub mod records;
pub mod schema;
pub mod storage;

pub use error::{Error, ErrorKind, Result};
pub use records::{
    read, read_v1, write, write_v1, ByteString, Decoder, Encoder, FieldAccess, FieldAccessor,
    PlainValue, RecordHeader, RecordIter, RecordView, StructDecoder, StructEncoder, TypeTag, Wire,
    WireFormat, MAGIC,
};
pub use schema::{
    check_compatibility, validate, validate_nested, FieldDefinition, Schema, SchemaSet,
    ValidationResult,
};
pub use storage::MappedReader;
