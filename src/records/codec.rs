//! # Wire Trait - Typed Encode/Decode
//!
//! [`Wire`] connects in-memory types to the wire format. The writer is
//! driven entirely by the in-memory type: a leaf value knows its
//! [`TypeTag`] and how to emit its payload; a struct emits its fields
//! through [`StructEncoder`](crate::records::encode::StructEncoder).
//!
//! Decoding is driven by the *on-wire* tag, which is how width coercion
//! works: `decode` receives the tag the writer recorded and accepts it when
//! it widens into the implementing type (`U8 -> U16/U32/U64`, signed
//! analogously, `F32 -> F64`). Any other mismatch is `FieldTypeMismatch`.
//! The reader never truncates.
//!
//! `from_literal` parses a schema `default_value` literal; `None` falls
//! back to the zero value (`Default::default()`), which is also the one
//! place where a stale, unparseable default recovers silently.
//!
//! ## Implementing for Structs
//!
//! ```ignore
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Wire for Person {
//!     const TAG: TypeTag = TypeTag::Struct;
//!
//!     fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
//!         let mut s = enc.begin_struct(2)?;
//!         s.field("id", &self.id)?;
//!         s.field("name", &self.name)?;
//!         s.finish()
//!     }
//!
//!     fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
//!         let mut s = dec.read_struct(wire)?;
//!         let id = s.field("id")?;
//!         let name = s.field("name")?;
//!         s.finish()?;
//!         Ok(Self { id, name })
//!     }
//! }
//! ```
//!
//! Field pulls must follow declaration order so the same impl also reads
//! the positional legacy format.

use crate::error::{Error, ErrorKind, Result};
use crate::records::decode::Decoder;
use crate::records::encode::{Encoder, WireFormat};
use crate::records::limits::MAX_PREALLOC_ELEMENTS;
use crate::records::types::TypeTag;

/// A type with a wire representation.
///
/// `Default` doubles as the zero value used by default materialization.
pub trait Wire: Default {
    const TAG: TypeTag;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()>;

    /// Decode a payload recorded under the on-wire tag `wire`.
    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self>;

    /// Parse a schema default literal. `None` means "use the zero value".
    fn from_literal(_literal: &str) -> Option<Self> {
        None
    }
}

fn narrow_error(expected: TypeTag, actual: TypeTag, position: usize) -> Error {
    Error::new(ErrorKind::FieldTypeMismatch, "wire type does not widen into target")
        .with_types(expected.name(), actual.name())
        .at_position(position)
}

macro_rules! impl_wire_unsigned {
    ($ty:ty, $tag:expr) => {
        impl Wire for $ty {
            const TAG: TypeTag = $tag;

            fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                enc.put_unsigned(u64::from(*self), $tag)
            }

            fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
                if !wire.widens_to($tag) {
                    return Err(narrow_error($tag, wire, dec.position()));
                }
                Ok(dec.read_unsigned(wire)? as $ty)
            }

            fn from_literal(literal: &str) -> Option<Self> {
                literal.trim().parse().ok()
            }
        }
    };
}

macro_rules! impl_wire_signed {
    ($ty:ty, $tag:expr) => {
        impl Wire for $ty {
            const TAG: TypeTag = $tag;

            fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                enc.put_signed(i64::from(*self), $tag)
            }

            fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
                if !wire.widens_to($tag) {
                    return Err(narrow_error($tag, wire, dec.position()));
                }
                Ok(dec.read_signed(wire)? as $ty)
            }

            fn from_literal(literal: &str) -> Option<Self> {
                literal.trim().parse().ok()
            }
        }
    };
}

impl_wire_unsigned!(u8, TypeTag::U8);
impl_wire_unsigned!(u16, TypeTag::U16);
impl_wire_unsigned!(u32, TypeTag::U32);
impl_wire_unsigned!(u64, TypeTag::U64);
impl_wire_signed!(i8, TypeTag::I8);
impl_wire_signed!(i16, TypeTag::I16);
impl_wire_signed!(i32, TypeTag::I32);
impl_wire_signed!(i64, TypeTag::I64);

/// The unit type is the Null tag: present, no payload.
impl Wire for () {
    const TAG: TypeTag = TypeTag::Null;

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<()> {
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::Null {
            return Err(narrow_error(TypeTag::Null, wire, dec.position()));
        }
        Ok(())
    }
}

impl Wire for bool {
    const TAG: TypeTag = TypeTag::Bool;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_bool(*self)
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::Bool {
            return Err(narrow_error(TypeTag::Bool, wire, dec.position()));
        }
        dec.read_bool()
    }

    fn from_literal(literal: &str) -> Option<Self> {
        match literal.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl Wire for f32 {
    const TAG: TypeTag = TypeTag::F32;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_f32(*self)
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::F32 {
            return Err(narrow_error(TypeTag::F32, wire, dec.position()));
        }
        dec.read_f32()
    }

    fn from_literal(literal: &str) -> Option<Self> {
        literal.trim().parse().ok()
    }
}

impl Wire for f64 {
    const TAG: TypeTag = TypeTag::F64;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_f64(*self)
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        match wire {
            TypeTag::F64 => dec.read_f64(),
            TypeTag::F32 => Ok(f64::from(dec.read_f32()?)),
            _ => Err(narrow_error(TypeTag::F64, wire, dec.position())),
        }
    }

    fn from_literal(literal: &str) -> Option<Self> {
        literal.trim().parse().ok()
    }
}

/// An opaque byte string: the wire-faithful string type. The wire never
/// validates UTF-8; this type carries whatever bytes were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl std::ops::Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Wire for ByteString {
    const TAG: TypeTag = TypeTag::String;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_len_prefixed(&self.0)
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::String {
            return Err(narrow_error(TypeTag::String, wire, dec.position()));
        }
        Ok(Self(dec.read_len_prefixed()?.to_vec()))
    }

    fn from_literal(literal: &str) -> Option<Self> {
        Some(Self(literal.as_bytes().to_vec()))
    }
}

/// UTF-8 convenience over the opaque wire string. Decoding validates and
/// fails with `InvalidData` on malformed bytes; use [`ByteString`] to read
/// arbitrary payloads.
impl Wire for String {
    const TAG: TypeTag = TypeTag::String;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_len_prefixed(self.as_bytes())
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::String {
            return Err(narrow_error(TypeTag::String, wire, dec.position()));
        }
        let start = dec.position();
        let bytes = dec.read_len_prefixed()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| {
                Error::new(ErrorKind::InvalidData, format!("string is not UTF-8: {e}"))
                    .at_position(start)
            })
    }

    fn from_literal(literal: &str) -> Option<Self> {
        Some(literal.to_owned())
    }
}

impl<T: Wire> Wire for Vec<T> {
    const TAG: TypeTag = TypeTag::Array;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.put_count(self.len())?;
        if enc.format() == WireFormat::V2 {
            enc.put_tag(T::TAG)?;
        }
        for item in self {
            item.encode(enc)?;
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        if wire != TypeTag::Array {
            return Err(narrow_error(TypeTag::Array, wire, dec.position()));
        }
        let count = dec.read_count()?;
        let elem_tag = match dec.format() {
            WireFormat::V2 => dec.read_elem_tag()?,
            WireFormat::V1 => T::TAG,
        };

        let mut items = Vec::new();
        items
            .try_reserve(count.min(MAX_PREALLOC_ELEMENTS))
            .map_err(|_| {
                Error::new(
                    ErrorKind::OutOfMemory,
                    format!("cannot reserve space for {count} array elements"),
                )
                .at_position(dec.position())
            })?;

        dec.descend()?;
        for _ in 0..count {
            match T::decode(dec, elem_tag) {
                Ok(item) => items.push(item),
                Err(e) => {
                    dec.ascend();
                    return Err(e);
                }
            }
        }
        dec.ascend();
        Ok(items)
    }
}
