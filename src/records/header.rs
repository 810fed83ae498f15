//! # Record Headers
//!
//! Every encoded record begins with the four-byte magic `ZCRT`, followed by
//! a format-version-dependent header:
//!
//! ```text
//! Format v1 (legacy, fixed-width, 11 bytes):
//!   Offset  Size  Description
//!   0       4     Magic "ZCRT"
//!   4       2     Format version = 1 (u16 little-endian)
//!   6       1     Top-level type tag
//!   7       4     Body size in bytes (u32 little-endian)
//!
//! Format v2 (versioned, varint-framed):
//!   Magic "ZCRT" (4 bytes)
//!   format_version     varint = 2
//!   type_tag           1 byte
//!   schema_version     varint (u32 range)
//!   data_size          varint (reserved; written as 0, ignored on read)
//!   schema_fingerprint varint (u32 range)
//! ```
//!
//! The byte at offset 4 dictates the layout: `0x01` begins the fixed v1
//! version field, anything else is decoded as the v2 format-version varint.
//! Unknown versions fail with `UnsupportedFormatVersion`.
//!
//! The legacy header is a `zerocopy` fixed-layout struct so reads and
//! writes go through safe transmutes; the v2 header is cursor-parsed.

use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::encoding::varint::{decode_varint_for_width, encode_varint};
use crate::error::{Error, ErrorKind, Result};
use crate::records::types::TypeTag;

/// On-wire magic, first four bytes of every record.
pub const MAGIC: [u8; 4] = *b"ZCRT";

pub const FORMAT_V1: u32 = 1;
pub const FORMAT_V2: u32 = 2;

/// Size of the fixed legacy header.
pub const LEGACY_HEADER_SIZE: usize = 11;

/// Byte offset of the legacy `data_size` field, backfilled after the body
/// is written.
const LEGACY_DATA_SIZE_OFFSET: usize = 7;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct LegacyHeader {
    magic: [u8; 4],
    version: U16,
    type_tag: u8,
    data_size: U32,
}

const _: () = assert!(std::mem::size_of::<LegacyHeader>() == LEGACY_HEADER_SIZE);

/// Parsed header of either format.
///
/// `schema_version` is 1 and `fingerprint` 0 for legacy records, which
/// predate both concepts. `data_size` is the true body length for v1 and
/// whatever the writer put in the reserved slot for v2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub format_version: u32,
    pub type_tag: TypeTag,
    pub schema_version: u32,
    pub data_size: u64,
    pub fingerprint: u32,
    pub header_len: usize,
}

impl RecordHeader {
    /// Parse a header from the front of `buf` without touching the body.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() >= MAGIC.len() && buf[..4] != MAGIC {
            return Err(
                Error::new(ErrorKind::InvalidData, "bad magic, expected ZCRT").at_position(0)
            );
        }
        if buf.len() < MAGIC.len() + 1 {
            return Err(Error::new(
                ErrorKind::EndOfBuffer,
                format!("{} bytes is too short for a record header", buf.len()),
            ));
        }

        if buf[4] == 0x01 {
            return Self::parse_legacy(buf);
        }

        let mut pos = 4;
        let format_version = decode_varint_for_width(buf, &mut pos, 32)? as u32;
        if format_version != FORMAT_V2 {
            return Err(Error::new(
                ErrorKind::UnsupportedFormatVersion,
                format!("format version {format_version} is not supported"),
            )
            .at_position(4));
        }

        let tag_pos = pos;
        let tag_byte = *buf.get(pos).ok_or_else(|| {
            Error::new(ErrorKind::EndOfBuffer, "header truncated before type tag").at_position(pos)
        })?;
        pos += 1;
        let type_tag = TypeTag::from_u8(tag_byte).map_err(|e| e.at_position(tag_pos))?;

        let schema_version = decode_varint_for_width(buf, &mut pos, 32)? as u32;
        let data_size = decode_varint_for_width(buf, &mut pos, 64)?;
        let fingerprint = decode_varint_for_width(buf, &mut pos, 32)? as u32;

        Ok(Self {
            format_version: FORMAT_V2,
            type_tag,
            schema_version,
            data_size,
            fingerprint,
            header_len: pos,
        })
    }

    fn parse_legacy(buf: &[u8]) -> Result<Self> {
        if buf.len() < LEGACY_HEADER_SIZE {
            return Err(Error::new(
                ErrorKind::EndOfBuffer,
                format!(
                    "legacy header needs {LEGACY_HEADER_SIZE} bytes, have {}",
                    buf.len()
                ),
            ));
        }

        let header = LegacyHeader::ref_from_bytes(&buf[..LEGACY_HEADER_SIZE])
            .map_err(|_| Error::new(ErrorKind::InvalidData, "malformed legacy header"))?;

        let version = header.version.get();
        if u32::from(version) != FORMAT_V1 {
            return Err(Error::new(
                ErrorKind::UnsupportedFormatVersion,
                format!("format version {version} is not supported"),
            )
            .at_position(4));
        }

        let type_tag = TypeTag::from_u8(header.type_tag).map_err(|e| e.at_position(6))?;
        let data_size = u64::from(header.data_size.get());

        if (LEGACY_HEADER_SIZE as u64 + data_size) > buf.len() as u64 {
            return Err(Error::new(
                ErrorKind::EndOfBuffer,
                format!(
                    "legacy body of {data_size} bytes exceeds the {} available",
                    buf.len() - LEGACY_HEADER_SIZE
                ),
            )
            .at_position(LEGACY_DATA_SIZE_OFFSET));
        }

        Ok(Self {
            format_version: FORMAT_V1,
            type_tag,
            schema_version: 1,
            data_size,
            fingerprint: 0,
            header_len: LEGACY_HEADER_SIZE,
        })
    }

    /// Total record length, for v1 derivable from the header alone.
    pub fn legacy_record_len(&self) -> usize {
        LEGACY_HEADER_SIZE + self.data_size as usize
    }
}

/// Emit a v2 header at `*pos`. The reserved `data_size` slot is written as 0.
pub fn write_v2_header(
    buf: &mut [u8],
    pos: &mut usize,
    type_tag: TypeTag,
    schema_version: u32,
    fingerprint: u32,
) -> Result<()> {
    put_bytes(buf, pos, &MAGIC)?;
    encode_varint(u64::from(FORMAT_V2), buf, pos)?;
    put_bytes(buf, pos, &[type_tag as u8])?;
    encode_varint(u64::from(schema_version), buf, pos)?;
    encode_varint(0, buf, pos)?;
    encode_varint(u64::from(fingerprint), buf, pos)?;
    Ok(())
}

/// Emit a legacy header at `*pos` with a zero `data_size` placeholder;
/// callers backfill it with [`patch_legacy_data_size`] once the body length
/// is known.
pub fn write_v1_header(buf: &mut [u8], pos: &mut usize, type_tag: TypeTag) -> Result<()> {
    let header = LegacyHeader {
        magic: MAGIC,
        version: U16::new(FORMAT_V1 as u16),
        type_tag: type_tag as u8,
        data_size: U32::new(0),
    };
    put_bytes(buf, pos, header.as_bytes())
}

pub fn patch_legacy_data_size(buf: &mut [u8], data_size: u32) {
    buf[LEGACY_DATA_SIZE_OFFSET..LEGACY_DATA_SIZE_OFFSET + 4]
        .copy_from_slice(&data_size.to_le_bytes());
}

fn put_bytes(buf: &mut [u8], pos: &mut usize, bytes: &[u8]) -> Result<()> {
    let remaining = buf.len().saturating_sub(*pos);
    if remaining < bytes.len() {
        return Err(Error::new(
            ErrorKind::BufferTooSmall,
            format!("need {} bytes, {remaining} remain", bytes.len()),
        )
        .at_position(*pos));
    }
    buf[*pos..*pos + bytes.len()].copy_from_slice(bytes);
    *pos += bytes.len();
    Ok(())
}
