//! # Decoder - Cursor-Threaded Reads
//!
//! [`Decoder`] walks a shared borrow of the input buffer with a monotonic
//! cursor. Reads that would pass the end of the buffer fail with
//! `EndOfBuffer`; nothing is ever read out of bounds or silently truncated.
//!
//! ## Struct Bodies
//!
//! [`StructDecoder`] is the forward/backward-compatibility engine. On the
//! versioned format it scans the on-wire field entries once up front,
//! recording `(name, tag, payload extent)` per entry without decoding or
//! allocating payloads; the extent comes from the skip algorithm, which
//! needs only the on-wire tags. Field pulls then resolve by name:
//!
//! - a matching entry decodes its payload, widening the on-wire integer or
//!   float type into the target when the lattice allows it;
//! - entries nobody pulls are simply never touched (skip-unknown);
//! - a missing entry materializes the schema default, the zero value for
//!   optional-without-default and schema-unknown fields, or fails with
//!   `RequiredFieldMissing`.
//!
//! Duplicate names resolve to the last on-wire occurrence. An empty on-wire
//! name matches no field and is skipped like any unknown.
//!
//! On the legacy format there are no tags; pulls decode positionally in
//! call order and [`StructDecoder::finish`] enforces that the declared
//! count was consumed exactly.

use smallvec::SmallVec;

use crate::encoding::varint::decode_varint_for_width;
use crate::error::{Error, ErrorKind, Result};
use crate::records::codec::Wire;
use crate::records::encode::WireFormat;
use crate::records::limits::{INLINE_FIELD_ENTRIES, MAX_NESTING_DEPTH};
use crate::records::types::TypeTag;
use crate::schema::Schema;

/// One tagged field observed in a versioned struct body. The payload is
/// identified by extent only; it is not decoded until (and unless) pulled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldEntry<'a> {
    pub(crate) name: &'a [u8],
    pub(crate) tag: TypeTag,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

pub(crate) type FieldEntries<'a> = SmallVec<[FieldEntry<'a>; INLINE_FIELD_ENTRIES]>;

#[derive(Debug)]
pub struct Decoder<'a, 's> {
    buf: &'a [u8],
    pos: usize,
    format: WireFormat,
    schema: Option<&'s Schema>,
    depth: u32,
}

impl<'a, 's> Decoder<'a, 's> {
    pub(crate) fn new(
        buf: &'a [u8],
        pos: usize,
        format: WireFormat,
        schema: Option<&'s Schema>,
    ) -> Self {
        Self {
            buf,
            pos,
            format,
            schema,
            depth: 0,
        }
    }

    fn at_depth(
        buf: &'a [u8],
        pos: usize,
        format: WireFormat,
        schema: Option<&'s Schema>,
        depth: u32,
    ) -> Self {
        Self {
            buf,
            pos,
            format,
            schema,
            depth,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.buf.len().saturating_sub(self.pos);
        if remaining < n {
            return Err(Error::new(
                ErrorKind::EndOfBuffer,
                format!("need {n} bytes, {remaining} remain"),
            )
            .at_position(self.pos));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_tag(&mut self) -> Result<TypeTag> {
        let tag_pos = self.pos;
        let byte = self.take(1)?[0];
        TypeTag::from_u8(byte).map_err(|e| e.at_position(tag_pos))
    }

    /// Read an unsigned integer carried under the on-wire `tag`.
    pub fn read_unsigned(&mut self, tag: TypeTag) -> Result<u64> {
        let bits = tag.int_bits().ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedType,
                format!("{tag} is not an integer tag"),
            )
            .at_position(self.pos)
        })?;
        match self.format {
            WireFormat::V2 => decode_varint_for_width(self.buf, &mut self.pos, bits),
            WireFormat::V1 => {
                let bytes = self.take(bits as usize / 8)?;
                let mut raw = [0u8; 8];
                raw[..bytes.len()].copy_from_slice(bytes);
                Ok(u64::from_le_bytes(raw))
            }
        }
    }

    /// Read a signed integer: the unsigned bit pattern at the wire width,
    /// sign-extended.
    pub fn read_signed(&mut self, tag: TypeTag) -> Result<i64> {
        let bits = tag.int_bits().ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedType,
                format!("{tag} is not an integer tag"),
            )
            .at_position(self.pos)
        })?;
        let raw = self.read_unsigned(tag)?;
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    /// Any non-zero byte reads as true; writers emit canonical 0x00/0x01.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Read an element or field count.
    pub fn read_count(&mut self) -> Result<usize> {
        let start = self.pos;
        let raw = match self.format {
            WireFormat::V2 => decode_varint_for_width(self.buf, &mut self.pos, 64)?,
            WireFormat::V1 => {
                let bytes = self.take(4)?;
                u64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        };
        usize::try_from(raw).map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("count {raw} exceeds the address space"),
            )
            .at_position(start)
        })
    }

    /// Read a length-prefixed byte payload (the string encoding), borrowing
    /// from the input buffer.
    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.read_count()?;
        self.take(len)
    }

    /// Read the element type tag of a versioned array body.
    pub fn read_elem_tag(&mut self) -> Result<TypeTag> {
        self.read_tag()
    }

    pub(crate) fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorKind::CorruptedData,
                format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
            )
            .at_position(self.pos));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Begin decoding a struct body whose on-wire tag was `wire`.
    pub fn read_struct(&mut self, wire: TypeTag) -> Result<StructDecoder<'_, 'a, 's>> {
        if wire != TypeTag::Struct {
            return Err(Error::new(
                ErrorKind::FieldTypeMismatch,
                "value on the wire is not a struct",
            )
            .with_types(TypeTag::Struct.name(), wire.name())
            .at_position(self.pos));
        }
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorKind::CorruptedData,
                format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
            )
            .at_position(self.pos));
        }

        let declared = self.read_count()?;
        let entries = match self.format {
            WireFormat::V2 => self.scan_entries(declared)?,
            WireFormat::V1 => FieldEntries::new(),
        };

        Ok(StructDecoder {
            dec: self,
            entries,
            declared,
            taken: 0,
        })
    }

    /// Scan `count` tagged entries, computing payload extents via the skip
    /// algorithm. Leaves the cursor at the end of the struct body.
    pub(crate) fn scan_entries(&mut self, count: usize) -> Result<FieldEntries<'a>> {
        let mut entries = FieldEntries::new();
        for _ in 0..count {
            let name_len = decode_varint_for_width(self.buf, &mut self.pos, 32)? as usize;
            let name = self.take(name_len)?;
            let tag = self.read_tag()?;
            let start = self.pos;
            self.skip_value(tag)?;
            entries.push(FieldEntry {
                name,
                tag,
                start,
                end: self.pos,
            });
        }
        Ok(entries)
    }

    /// Consume one value identified only by its on-wire tag. This is what
    /// makes unknown fields skippable without the reader's static type.
    /// Versioned format only; the legacy format carries no tags to skip by.
    pub fn skip_value(&mut self, tag: TypeTag) -> Result<()> {
        self.skip_inner(tag, self.depth)
    }

    fn skip_inner(&mut self, tag: TypeTag, depth: u32) -> Result<()> {
        match tag {
            TypeTag::Null => Ok(()),
            TypeTag::Bool => self.take(1).map(|_| ()),
            TypeTag::U8
            | TypeTag::U16
            | TypeTag::U32
            | TypeTag::U64
            | TypeTag::I8
            | TypeTag::I16
            | TypeTag::I32
            | TypeTag::I64 => {
                let bits = tag.int_bits().unwrap_or(64);
                decode_varint_for_width(self.buf, &mut self.pos, bits).map(|_| ())
            }
            TypeTag::F32 => self.take(4).map(|_| ()),
            TypeTag::F64 => self.take(8).map(|_| ()),
            TypeTag::String => {
                let len = self.read_count()?;
                self.take(len).map(|_| ())
            }
            TypeTag::Array => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(Error::new(
                        ErrorKind::CorruptedData,
                        format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
                    )
                    .at_position(self.pos));
                }
                let count = self.read_count()?;
                let elem = self.read_tag()?;
                for _ in 0..count {
                    self.skip_inner(elem, depth + 1)?;
                }
                Ok(())
            }
            TypeTag::Struct => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(Error::new(
                        ErrorKind::CorruptedData,
                        format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
                    )
                    .at_position(self.pos));
                }
                let count = self.read_count()?;
                for _ in 0..count {
                    let name_len = decode_varint_for_width(self.buf, &mut self.pos, 32)? as usize;
                    self.take(name_len)?;
                    let tag = self.read_tag()?;
                    self.skip_inner(tag, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Pull-based access to the fields of one struct body.
#[derive(Debug)]
pub struct StructDecoder<'d, 'a, 's> {
    dec: &'d mut Decoder<'a, 's>,
    entries: FieldEntries<'a>,
    declared: usize,
    taken: usize,
}

impl<'d, 'a, 's> StructDecoder<'d, 'a, 's> {
    /// Decode the field named `name` into `F`, or materialize its default.
    ///
    /// On the legacy format pulls are positional: call order must match the
    /// writer's declaration order, and `name` is used only for diagnostics.
    pub fn field<F: Wire>(&mut self, name: &str) -> Result<F> {
        match self.dec.format {
            WireFormat::V1 => {
                if self.taken == self.declared {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!("legacy struct carries only {} fields", self.declared),
                    )
                    .with_field(name));
                }
                self.taken += 1;
                self.dec.descend()?;
                let value = F::decode(self.dec, F::TAG);
                self.dec.ascend();
                value.map_err(|e| e.with_field(name))
            }
            WireFormat::V2 => {
                // Last write wins when a name repeats on the wire.
                let mut found: Option<FieldEntry<'a>> = None;
                for entry in &self.entries {
                    if entry.name == name.as_bytes() {
                        found = Some(*entry);
                    }
                }
                match found {
                    Some(entry) => {
                        let mut sub = Decoder::at_depth(
                            self.dec.buf,
                            entry.start,
                            WireFormat::V2,
                            self.dec.schema,
                            self.dec.depth + 1,
                        );
                        let value =
                            F::decode(&mut sub, entry.tag).map_err(|e| e.with_field(name))?;
                        if sub.pos != entry.end {
                            return Err(Error::new(
                                ErrorKind::CorruptedData,
                                "field payload length disagrees with its skip extent",
                            )
                            .with_field(name)
                            .at_position(sub.pos));
                        }
                        Ok(value)
                    }
                    None => self.materialize_default(name),
                }
            }
        }
    }

    /// Default materialization for a field absent from the wire: the
    /// schema default if one is declared (a stale literal that no longer
    /// parses recovers silently to the zero value), the zero value for
    /// optional and schema-unknown fields, `RequiredFieldMissing` otherwise.
    fn materialize_default<F: Wire>(&self, name: &str) -> Result<F> {
        match self.dec.schema.and_then(|schema| schema.field(name)) {
            Some(def) => {
                if let Some(literal) = def.default_value.as_deref() {
                    Ok(F::from_literal(literal).unwrap_or_default())
                } else if !def.required {
                    Ok(F::default())
                } else {
                    Err(Error::new(
                        ErrorKind::RequiredFieldMissing,
                        "required field is absent from the record",
                    )
                    .with_field(name))
                }
            }
            None => Ok(F::default()),
        }
    }

    /// Finish the struct body. On the legacy format this enforces that the
    /// declared field count was pulled exactly.
    pub fn finish(self) -> Result<()> {
        if self.dec.format == WireFormat::V1 && self.taken != self.declared {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "legacy struct declared {} fields, decoded {}",
                    self.declared, self.taken
                ),
            ));
        }
        Ok(())
    }
}
