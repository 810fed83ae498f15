//! # Zero-Copy Record Views
//!
//! [`RecordView`] parses only the header on creation; everything after that
//! is lazy cursor arithmetic over the borrowed input buffer. The view's
//! lifetime parameter ties it to the buffer, so the borrow checker enforces
//! the use-after-free contract at compile time.
//!
//! [`FieldAccessor`] adds the typed surface: `get` materializes the whole
//! value through the ordinary reader, `get_field` walks the struct body
//! skipping siblings and returns just the target field. String payloads
//! come back as [`FieldAccess::View`], a borrowed slice into the input
//! buffer with no copy; scalars and composites come back as
//! [`FieldAccess::Owned`].
//!
//! [`RecordIter`] walks concatenated records. Record length is derived from
//! the body structure (header plus structural skip) for versioned records
//! and from the header `data_size` for legacy records, which is the one
//! place that slot is trusted; the reserved v2 slot is never used for
//! advancement.

use std::marker::PhantomData;

use crate::error::{Error, ErrorKind, Result};
use crate::records::codec::Wire;
use crate::records::decode::{Decoder, FieldEntry};
use crate::records::encode::WireFormat;
use crate::records::header::{RecordHeader, FORMAT_V1, MAGIC};
use crate::records::reader;
use crate::records::types::TypeTag;
use crate::schema::Schema;

/// A header-validated window onto one encoded record.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    data: &'a [u8],
    header: RecordHeader,
}

impl<'a> RecordView<'a> {
    /// Validate and parse the header; the body is untouched until accessed.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let header = RecordHeader::parse(data)?;
        Ok(Self { data, header })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn type_tag(&self) -> TypeTag {
        self.header.type_tag
    }

    pub fn format_version(&self) -> u32 {
        self.header.format_version
    }

    pub fn schema_version(&self) -> u32 {
        self.header.schema_version
    }

    /// Bytes of the record body, after the header.
    pub fn body(&self) -> &'a [u8] {
        &self.data[self.header.header_len..]
    }

    /// Typed accessor over this record; fails with `TypeMismatch` when the
    /// record's top-level tag is not `T`'s.
    pub fn accessor<T: Wire>(&self) -> Result<FieldAccessor<'a, T>> {
        if self.header.type_tag != T::TAG {
            return Err(Error::new(
                ErrorKind::TypeMismatch,
                "record's top-level type does not match the requested type",
            )
            .with_types(T::TAG.name(), self.header.type_tag.name()));
        }
        Ok(FieldAccessor {
            view: *self,
            _marker: PhantomData,
        })
    }

    /// Exact length of this record (header plus body), derived structurally
    /// for versioned records.
    pub fn record_len(&self) -> Result<usize> {
        if self.header.format_version == FORMAT_V1 {
            return Ok(self.header.legacy_record_len());
        }
        let mut dec = Decoder::new(self.data, self.header.header_len, WireFormat::V2, None);
        dec.skip_value(self.header.type_tag)?;
        Ok(dec.position())
    }

    /// Walk the struct body and return the field named `name`, expected to
    /// carry `want` (or a type that widens into it).
    ///
    /// Strings come back borrowed, scalars and composites owned. Duplicate
    /// on-wire names resolve to the last occurrence; unknown names fail
    /// with `UnknownField`.
    pub fn get_field(&self, name: &str, want: TypeTag) -> Result<FieldAccess<'a>> {
        if self.header.type_tag != TypeTag::Struct {
            return Err(Error::new(
                ErrorKind::TypeMismatch,
                "field access requires a struct record",
            )
            .with_types(TypeTag::Struct.name(), self.header.type_tag.name()));
        }
        if self.header.format_version == FORMAT_V1 {
            return Err(Error::new(
                ErrorKind::UnsupportedFormatVersion,
                "legacy records carry no field names to look up",
            ));
        }

        let mut dec = Decoder::new(self.data, self.header.header_len, WireFormat::V2, None);
        let count = dec.read_count()?;
        let entries = dec.scan_entries(count)?;

        let mut found: Option<FieldEntry<'a>> = None;
        for entry in &entries {
            if entry.name == name.as_bytes() {
                found = Some(*entry);
            }
        }
        let entry = found.ok_or_else(|| {
            Error::new(ErrorKind::UnknownField, "record carries no such field").with_field(name)
        })?;

        self.extract(entry, want)
            .map_err(|e| e.with_field(name))
    }

    fn extract(&self, entry: FieldEntry<'a>, want: TypeTag) -> Result<FieldAccess<'a>> {
        let mismatch = || {
            Error::new(ErrorKind::FieldTypeMismatch, "wire type does not widen into target")
                .with_types(want.name(), entry.tag.name())
                .at_position(entry.start)
        };

        let mut dec = Decoder::new(self.data, entry.start, WireFormat::V2, None);
        let value = match want {
            TypeTag::String => {
                if entry.tag != TypeTag::String {
                    return Err(mismatch());
                }
                return Ok(FieldAccess::View(dec.read_len_prefixed()?));
            }
            TypeTag::Null => {
                if entry.tag != TypeTag::Null {
                    return Err(mismatch());
                }
                PlainValue::Null
            }
            TypeTag::Bool => {
                if entry.tag != TypeTag::Bool {
                    return Err(mismatch());
                }
                PlainValue::Bool(dec.read_bool()?)
            }
            TypeTag::U8 | TypeTag::U16 | TypeTag::U32 | TypeTag::U64 => {
                if !entry.tag.widens_to(want) {
                    return Err(mismatch());
                }
                let raw = dec.read_unsigned(entry.tag)?;
                match want {
                    TypeTag::U8 => PlainValue::U8(raw as u8),
                    TypeTag::U16 => PlainValue::U16(raw as u16),
                    TypeTag::U32 => PlainValue::U32(raw as u32),
                    _ => PlainValue::U64(raw),
                }
            }
            TypeTag::I8 | TypeTag::I16 | TypeTag::I32 | TypeTag::I64 => {
                if !entry.tag.widens_to(want) {
                    return Err(mismatch());
                }
                let raw = dec.read_signed(entry.tag)?;
                match want {
                    TypeTag::I8 => PlainValue::I8(raw as i8),
                    TypeTag::I16 => PlainValue::I16(raw as i16),
                    TypeTag::I32 => PlainValue::I32(raw as i32),
                    _ => PlainValue::I64(raw),
                }
            }
            TypeTag::F32 => {
                if entry.tag != TypeTag::F32 {
                    return Err(mismatch());
                }
                PlainValue::F32(dec.read_f32()?)
            }
            TypeTag::F64 => match entry.tag {
                TypeTag::F64 => PlainValue::F64(dec.read_f64()?),
                TypeTag::F32 => PlainValue::F64(f64::from(dec.read_f32()?)),
                _ => return Err(mismatch()),
            },
            TypeTag::Array | TypeTag::Struct => {
                if entry.tag != want {
                    return Err(mismatch());
                }
                PlainValue::Composite {
                    tag: entry.tag,
                    bytes: self.data[entry.start..entry.end].to_vec(),
                }
            }
        };
        Ok(FieldAccess::Owned(value))
    }
}

/// Typed handle over a [`RecordView`] whose top-level tag matched `T`.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a, T: Wire> {
    view: RecordView<'a>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Wire> FieldAccessor<'a, T> {
    /// Materialize the whole record, defaults and coercions included.
    pub fn get(&self, schema: &Schema) -> Result<T> {
        reader::decode_record(self.view.data, &self.view.header, Some(schema))
    }

    /// Extract one field without materializing the rest of the record.
    pub fn get_field(&self, name: &str, want: TypeTag) -> Result<FieldAccess<'a>> {
        self.view.get_field(name, want)
    }

    pub fn view(&self) -> &RecordView<'a> {
        &self.view
    }
}

/// Result of a single-field extraction: borrowed for string payloads,
/// owned for everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAccess<'a> {
    Owned(PlainValue),
    View(&'a [u8]),
}

impl<'a> FieldAccess<'a> {
    pub fn is_view(&self) -> bool {
        matches!(self, FieldAccess::View(_))
    }

    pub fn as_view(&self) -> Option<&'a [u8]> {
        match self {
            FieldAccess::View(bytes) => Some(bytes),
            FieldAccess::Owned(_) => None,
        }
    }

    pub fn as_owned(&self) -> Option<&PlainValue> {
        match self {
            FieldAccess::Owned(value) => Some(value),
            FieldAccess::View(_) => None,
        }
    }
}

/// An owned scalar, or the raw encoded payload of a composite.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Null,
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Composite { tag: TypeTag, bytes: Vec<u8> },
}

/// Iterator over concatenated records in one buffer. Advancement is by each
/// record's derived length; a decoding failure yields one `Err` item and
/// ends the iteration.
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Absolute byte offset of the next unread record.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<RecordView<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let offset = self.pos;
        let remaining = &self.data[offset..];

        if remaining.len() >= MAGIC.len() && remaining[..4] != MAGIC {
            self.pos = self.data.len();
            return Some(Err(Error::new(
                ErrorKind::InvalidMagicNumber,
                "record boundary does not start with ZCRT",
            )
            .at_position(offset)));
        }

        let view = match RecordView::new(remaining) {
            Ok(view) => view,
            Err(e) => {
                self.pos = self.data.len();
                return Some(Err(e));
            }
        };
        match view.record_len() {
            Ok(len) => self.pos = offset + len,
            Err(e) => {
                self.pos = self.data.len();
                return Some(Err(e));
            }
        }
        Some(Ok(view))
    }
}
