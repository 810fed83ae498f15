//! # Framed Reader
//!
//! [`read`] reverses [`write`](crate::records::writer::write): header phase
//! (magic, format version, top-level tag against the target type, schema
//! version bookkeeping), body phase (tagged struct reads with skip-unknown
//! and width coercion), default phase (schema defaults, zero values, or
//! `RequiredFieldMissing`), all driven through the target's
//! [`Wire`] implementation.
//!
//! The reader accepts both format versions and specializes on the one it
//! observes; [`read_v1`] is the legacy entry point and rejects versioned
//! input. The header's schema fingerprint is advisory: a mismatch against
//! the reader's schema is logged and never fails the read, because writer
//! and reader schemas legitimately differ during evolution.

use crate::error::{Error, ErrorKind, Result};
use crate::records::codec::Wire;
use crate::records::decode::Decoder;
use crate::records::encode::WireFormat;
use crate::records::header::{RecordHeader, FORMAT_V1, FORMAT_V2};
use crate::schema::Schema;

/// Deserialize a `T` from the front of `buf`, reconciling differences
/// between the writing shape and `T` through `schema`.
pub fn read<T: Wire>(buf: &[u8], schema: &Schema) -> Result<T> {
    let header = RecordHeader::parse(buf)?;
    decode_record(buf, &header, Some(schema))
}

/// Deserialize a legacy record. Versioned input is rejected with
/// `UnsupportedFormatVersion`.
pub fn read_v1<T: Wire>(buf: &[u8]) -> Result<T> {
    let header = RecordHeader::parse(buf)?;
    if header.format_version != FORMAT_V1 {
        return Err(Error::new(
            ErrorKind::UnsupportedFormatVersion,
            format!(
                "legacy reader cannot decode format version {}",
                header.format_version
            ),
        ));
    }
    decode_record(buf, &header, None)
}

pub(crate) fn decode_record<T: Wire>(
    buf: &[u8],
    header: &RecordHeader,
    schema: Option<&Schema>,
) -> Result<T> {
    if header.type_tag != T::TAG {
        return Err(Error::new(
            ErrorKind::TypeMismatch,
            "record's top-level type does not match the requested type",
        )
        .with_types(T::TAG.name(), header.type_tag.name()));
    }

    if header.format_version == FORMAT_V2 {
        if let Some(schema) = schema {
            let expected = schema.fingerprint();
            if header.fingerprint != expected {
                log::warn!(
                    "Schema fingerprint mismatch for `{}`: expected {expected:#010X}, got {:#010X}",
                    schema.name,
                    header.fingerprint
                );
            }
        }
    }

    let format = match header.format_version {
        FORMAT_V1 => WireFormat::V1,
        _ => WireFormat::V2,
    };
    let mut dec = Decoder::new(buf, header.header_len, format, schema);
    T::decode(&mut dec, header.type_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::codec::ByteString;
    use crate::records::writer::{write, write_v1};
    use crate::schema::Schema;

    #[test]
    fn legacy_int_reads_back() {
        let mut buf = [0u8; 64];
        let written = write_v1(&42i32, &mut buf).unwrap();
        assert_eq!(written, 15);
        assert_eq!(read_v1::<i32>(&buf).unwrap(), 42);
    }

    #[test]
    fn legacy_unicode_string_reads_back_byte_exact() {
        let original = "Hello, 世界! 🌍🚀";
        let mut buf = [0u8; 128];
        write_v1(&ByteString::from(original), &mut buf).unwrap();

        let back: ByteString = read_v1(&buf).unwrap();
        assert_eq!(back.as_bytes(), original.as_bytes());
    }

    #[test]
    fn versioned_scalar_roundtrip_through_unified_reader() {
        let schema = Schema::new("n", 1);
        let mut buf = [0u8; 64];
        write(&0xCAFEu16, &mut buf, &schema).unwrap();
        assert_eq!(read::<u16>(&buf, &schema).unwrap(), 0xCAFE);
    }

    #[test]
    fn unified_reader_accepts_legacy_records() {
        let schema = Schema::new("n", 1);
        let mut buf = [0u8; 64];
        write_v1(&-9i64, &mut buf).unwrap();
        assert_eq!(read::<i64>(&buf, &schema).unwrap(), -9);
    }

    #[test]
    fn legacy_reader_rejects_versioned_records() {
        let schema = Schema::new("n", 1);
        let mut buf = [0u8; 64];
        write(&1u8, &mut buf, &schema).unwrap();

        let err = read_v1::<u8>(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormatVersion);
    }

    #[test]
    fn top_level_tag_mismatch_is_type_mismatch() {
        let schema = Schema::new("n", 1);
        let mut buf = [0u8; 64];
        write(&1u8, &mut buf, &schema).unwrap();

        let err = read::<String>(&buf, &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.expected(), Some("string"));
        assert_eq!(err.actual(), Some("u8"));
    }

    #[test]
    fn fingerprint_mismatch_does_not_fail_the_read() {
        let writer_schema = Schema::new("old_name", 1);
        let reader_schema = Schema::new("new_name", 3);
        let mut buf = [0u8; 64];
        write(&5u32, &mut buf, &writer_schema).unwrap();

        assert_eq!(read::<u32>(&buf, &reader_schema).unwrap(), 5);
    }
}
