//! # Encoder - Cursor-Threaded Writes
//!
//! [`Encoder`] owns a mutable borrow of the caller's output buffer and a
//! monotonically advancing cursor. It never allocates and never writes past
//! `buf.len()`; an operation that would overflow fails with
//! `BufferTooSmall` and leaves the cursor where it was before the failing
//! primitive.
//!
//! The encoder carries the wire format chosen by the entry point:
//!
//! | Primitive | Versioned (v2)        | Legacy (v1)           |
//! |-----------|-----------------------|-----------------------|
//! | integers  | varint                | fixed-width LE        |
//! | floats    | fixed 4/8 bytes LE    | fixed 4/8 bytes LE    |
//! | bool      | 1 byte, 0x00/0x01     | same                  |
//! | string    | varint byte length    | u32 LE byte length    |
//! | counts    | varint                | u32 LE                |
//!
//! Struct bodies go through [`StructEncoder`], which writes the declared
//! field count up front and, on the versioned format, a name and type tag
//! per field. The legacy format emits bare payloads in declaration order.

use crate::encoding::varint::encode_varint;
use crate::error::{Error, ErrorKind, Result};
use crate::records::codec::Wire;
use crate::records::types::TypeTag;

/// Wire format selector, fixed for the lifetime of one write or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    V1,
    V2,
}

#[derive(Debug)]
pub struct Encoder<'b> {
    buf: &'b mut [u8],
    pos: usize,
    format: WireFormat,
}

impl<'b> Encoder<'b> {
    pub(crate) fn new(buf: &'b mut [u8], pos: usize, format: WireFormat) -> Self {
        Self { buf, pos, format }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let remaining = self.buf.len().saturating_sub(self.pos);
        if remaining < bytes.len() {
            return Err(Error::new(
                ErrorKind::BufferTooSmall,
                format!("need {} bytes, {remaining} remain", bytes.len()),
            )
            .at_position(self.pos));
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub fn put_tag(&mut self, tag: TypeTag) -> Result<()> {
        self.put_bytes(&[tag as u8])
    }

    pub fn put_varint(&mut self, value: u64) -> Result<()> {
        encode_varint(value, self.buf, &mut self.pos)
    }

    /// Emit an unsigned integer as the payload of a field tagged `tag`.
    pub fn put_unsigned(&mut self, value: u64, tag: TypeTag) -> Result<()> {
        match self.format {
            WireFormat::V2 => self.put_varint(value),
            WireFormat::V1 => {
                let bits = tag.int_bits().ok_or_else(|| {
                    Error::new(
                        ErrorKind::UnsupportedType,
                        format!("{tag} is not an integer tag"),
                    )
                })?;
                let bytes = value.to_le_bytes();
                self.put_bytes(&bytes[..bits as usize / 8])
            }
        }
    }

    /// Emit a signed integer, bit-reinterpreted as the unsigned counterpart
    /// of the same width.
    pub fn put_signed(&mut self, value: i64, tag: TypeTag) -> Result<()> {
        let bits = tag.int_bits().ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedType,
                format!("{tag} is not an integer tag"),
            )
        })?;
        let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        self.put_unsigned(value as u64 & mask, tag)
    }

    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    pub fn put_f64(&mut self, value: f64) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    pub fn put_bool(&mut self, value: bool) -> Result<()> {
        self.put_bytes(&[u8::from(value)])
    }

    /// Emit a length-prefixed byte payload (the string encoding).
    pub fn put_len_prefixed(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_count(bytes.len())?;
        self.put_bytes(bytes)
    }

    /// Emit an element or field count.
    pub fn put_count(&mut self, count: usize) -> Result<()> {
        match self.format {
            WireFormat::V2 => self.put_varint(count as u64),
            WireFormat::V1 => {
                let count = u32::try_from(count).map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("count {count} exceeds the legacy u32 limit"),
                    )
                    .at_position(self.pos)
                })?;
                self.put_bytes(&count.to_le_bytes())
            }
        }
    }

    /// Start a struct body of exactly `field_count` fields.
    pub fn begin_struct(&mut self, field_count: usize) -> Result<StructEncoder<'_, 'b>> {
        self.put_count(field_count)?;
        Ok(StructEncoder {
            enc: self,
            declared: field_count,
            written: 0,
        })
    }
}

/// Writes the name-tagged fields of one struct body.
///
/// [`StructEncoder::finish`] enforces that exactly the declared number of
/// fields was emitted, so the on-wire count can never drift from the body.
#[derive(Debug)]
pub struct StructEncoder<'e, 'b> {
    enc: &'e mut Encoder<'b>,
    declared: usize,
    written: usize,
}

impl<'e, 'b> StructEncoder<'e, 'b> {
    pub fn field<F: Wire>(&mut self, name: &str, value: &F) -> Result<()> {
        if self.written == self.declared {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("struct declared {} fields but emitted more", self.declared),
            )
            .with_field(name));
        }
        if self.enc.format == WireFormat::V2 {
            self.enc.put_varint(name.len() as u64)?;
            self.enc.put_bytes(name.as_bytes())?;
            self.enc.put_tag(F::TAG)?;
        }
        value
            .encode(self.enc)
            .map_err(|e| e.with_field(name))?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        if self.written != self.declared {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "struct declared {} fields but emitted {}",
                    self.declared, self.written
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_integers_are_varints() {
        let mut buf = [0u8; 16];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        enc.put_unsigned(300, TypeTag::U32).unwrap();
        assert_eq!(enc.position(), 2);
        assert_eq!(&buf[..2], &[0xAC, 0x02]);
    }

    #[test]
    fn legacy_integers_are_fixed_width() {
        let mut buf = [0u8; 16];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V1);
        enc.put_unsigned(300, TypeTag::U32).unwrap();
        assert_eq!(enc.position(), 4);
        assert_eq!(&buf[..4], &[0x2C, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn signed_values_reinterpret_at_width() {
        let mut buf = [0u8; 16];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V1);
        enc.put_signed(-1, TypeTag::I16).unwrap();
        assert_eq!(&buf[..2], &[0xFF, 0xFF]);

        let mut buf = [0u8; 16];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        enc.put_signed(-1, TypeTag::I8).unwrap();
        let end = enc.position();
        // 0xFF as a varint: 0xFF 0x01.
        assert_eq!(&buf[..end], &[0xFF, 0x01]);
    }

    #[test]
    fn empty_string_is_a_single_zero_byte() {
        let mut buf = [0u8; 4];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        enc.put_len_prefixed(b"").unwrap();
        assert_eq!(enc.position(), 1);
        assert_eq!(buf[0], 0x00);
    }

    #[test]
    fn overflow_reports_buffer_too_small() {
        let mut buf = [0u8; 3];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        let err = enc.put_bytes(b"abcd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn struct_encoder_enforces_declared_count() {
        let mut buf = [0u8; 64];
        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        let mut s = enc.begin_struct(2).unwrap();
        s.field("a", &1u32).unwrap();
        let err = s.finish().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let mut enc = Encoder::new(&mut buf, 0, WireFormat::V2);
        let mut s = enc.begin_struct(1).unwrap();
        s.field("a", &1u32).unwrap();
        let err = s.field("b", &2u32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
