//! # Framed Writer
//!
//! Entry points that frame one value into one caller-provided buffer:
//! header first, body second, cursor strictly monotonic. The engine never
//! allocates the output; a value that does not fit fails with
//! `BufferTooSmall`.
//!
//! [`write`] emits the versioned format. The writer is driven by the
//! in-memory type; the schema contributes only the header's version and
//! fingerprint, so a type field the schema does not describe is still
//! emitted and a schema field the type lacks simply is not.
//!
//! [`write_v1`] emits the legacy schema-less format and backfills the
//! header's `data_size` with the true body length once the body is written.

use crate::error::{Error, ErrorKind, Result};
use crate::records::codec::Wire;
use crate::records::encode::{Encoder, WireFormat};
use crate::records::header::{self, LEGACY_HEADER_SIZE};
use crate::schema::Schema;

/// Serialize `value` into `buf` in the versioned format. Returns the number
/// of bytes written.
pub fn write<T: Wire>(value: &T, buf: &mut [u8], schema: &Schema) -> Result<usize> {
    let mut pos = 0;
    header::write_v2_header(buf, &mut pos, T::TAG, schema.version, schema.fingerprint())?;

    let mut enc = Encoder::new(buf, pos, WireFormat::V2);
    value.encode(&mut enc)?;
    Ok(enc.position())
}

/// Serialize `value` into `buf` in the legacy fixed-width format used for
/// records without a schema descriptor. Returns the number of bytes written.
pub fn write_v1<T: Wire>(value: &T, buf: &mut [u8]) -> Result<usize> {
    let mut pos = 0;
    header::write_v1_header(buf, &mut pos, T::TAG)?;

    let mut enc = Encoder::new(buf, pos, WireFormat::V1);
    value.encode(&mut enc)?;
    let end = enc.position();

    let body_len = end - LEGACY_HEADER_SIZE;
    let body_len = u32::try_from(body_len).map_err(|_| {
        Error::new(
            ErrorKind::InvalidData,
            format!("body of {body_len} bytes exceeds the legacy u32 size field"),
        )
    })?;
    header::patch_legacy_data_size(buf, body_len);
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::types::TypeTag;
    use crate::schema::Schema;

    #[test]
    fn legacy_int_layout_is_byte_stable() {
        let mut buf = [0u8; 64];
        let written = write_v1(&42i32, &mut buf).unwrap();
        assert_eq!(written, 15);
        assert_eq!(&buf[..4], b"ZCRT");
        assert_eq!(&buf[4..6], &[0x01, 0x00]);
        assert_eq!(buf[6], 0x08);
        assert_eq!(&buf[7..11], &[0x04, 0x00, 0x00, 0x00]);
        assert_eq!(&buf[11..15], &[0x2A, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn versioned_header_carries_schema_version_and_fingerprint() {
        let schema = Schema::new("point", 7);
        let mut buf = [0u8; 64];
        let written = write(&3u8, &mut buf, &schema).unwrap();

        let header = crate::records::header::RecordHeader::parse(&buf[..written]).unwrap();
        assert_eq!(header.format_version, 2);
        assert_eq!(header.type_tag, TypeTag::U8);
        assert_eq!(header.schema_version, 7);
        assert_eq!(header.fingerprint, schema.fingerprint());
        assert_eq!(header.data_size, 0);
    }

    #[test]
    fn identical_inputs_produce_identical_bytes() {
        let schema = Schema::new("s", 1);
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        let la = write(&123456u64, &mut a, &schema).unwrap();
        let lb = write(&123456u64, &mut b, &schema).unwrap();
        assert_eq!(la, lb);
        assert_eq!(&a[..la], &b[..lb]);
    }

    #[test]
    fn oversized_value_reports_buffer_too_small() {
        let schema = Schema::new("s", 1);
        let mut buf = [0u8; 4];
        let err = write(
            &"This string is definitely too large for the buffer".to_owned(),
            &mut buf,
            &schema,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall);

        let mut buf = [0u8; 4];
        let err = write_v1(&7u64, &mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
    }
}
