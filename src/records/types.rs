//! # Type Tags
//!
//! Every value on the wire is identified by a single-byte [`TypeTag`]. The
//! numeric codes are stable; codes past `0x0E` are reserved and fail to
//! parse with `InvalidTypeTag`.
//!
//! The tag doubles as the vocabulary of the widening lattice used both by
//! the reader's coercion rules and the schema compatibility check:
//! unsigned widths widen upward (`U8 <= U16 <= U32 <= U64`), signed widths
//! analogously, and `F32` widens to `F64`. There is no cross-signedness,
//! int-to-float, or int-to-string coercion; `Bool`, `String`, `Array`, and
//! `Struct` only match themselves.

use std::fmt;

use crate::error::{Error, ErrorKind, Result};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null = 0x00,
    Bool = 0x01,
    U8 = 0x02,
    U16 = 0x03,
    U32 = 0x04,
    U64 = 0x05,
    I8 = 0x06,
    I16 = 0x07,
    I32 = 0x08,
    I64 = 0x09,
    F32 = 0x0A,
    F64 = 0x0B,
    String = 0x0C,
    Array = 0x0D,
    Struct = 0x0E,
}

impl TypeTag {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(TypeTag::Null),
            0x01 => Ok(TypeTag::Bool),
            0x02 => Ok(TypeTag::U8),
            0x03 => Ok(TypeTag::U16),
            0x04 => Ok(TypeTag::U32),
            0x05 => Ok(TypeTag::U64),
            0x06 => Ok(TypeTag::I8),
            0x07 => Ok(TypeTag::I16),
            0x08 => Ok(TypeTag::I32),
            0x09 => Ok(TypeTag::I64),
            0x0A => Ok(TypeTag::F32),
            0x0B => Ok(TypeTag::F64),
            0x0C => Ok(TypeTag::String),
            0x0D => Ok(TypeTag::Array),
            0x0E => Ok(TypeTag::Struct),
            _ => Err(Error::new(
                ErrorKind::InvalidTypeTag,
                format!("reserved type tag 0x{value:02X}"),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Struct => "struct",
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, TypeTag::U8 | TypeTag::U16 | TypeTag::U32 | TypeTag::U64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, TypeTag::I8 | TypeTag::I16 | TypeTag::I32 | TypeTag::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, TypeTag::F32 | TypeTag::F64)
    }

    /// Bit width for integer tags.
    pub fn int_bits(&self) -> Option<u32> {
        match self {
            TypeTag::U8 | TypeTag::I8 => Some(8),
            TypeTag::U16 | TypeTag::I16 => Some(16),
            TypeTag::U32 | TypeTag::I32 => Some(32),
            TypeTag::U64 | TypeTag::I64 => Some(64),
            _ => None,
        }
    }

    /// Payload size in the legacy fixed-width body, when fixed.
    pub fn legacy_size(&self) -> Option<usize> {
        match self {
            TypeTag::Null => Some(0),
            TypeTag::Bool | TypeTag::U8 | TypeTag::I8 => Some(1),
            TypeTag::U16 | TypeTag::I16 => Some(2),
            TypeTag::U32 | TypeTag::I32 | TypeTag::F32 => Some(4),
            TypeTag::U64 | TypeTag::I64 | TypeTag::F64 => Some(8),
            TypeTag::String | TypeTag::Array | TypeTag::Struct => None,
        }
    }

    /// Whether a value tagged `self` on the wire may be read into a `target`
    /// slot. Identity always holds; integers widen within their signedness,
    /// floats widen `F32 -> F64`, everything else requires an exact match.
    pub fn widens_to(self, target: TypeTag) -> bool {
        if self == target {
            return true;
        }
        match (self.int_bits(), target.int_bits()) {
            (Some(from), Some(to)) => {
                from < to
                    && ((self.is_unsigned() && target.is_unsigned())
                        || (self.is_signed() && target.is_signed()))
            }
            _ => self == TypeTag::F32 && target == TypeTag::F64,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_numeric_codes() {
        assert_eq!(TypeTag::Null as u8, 0x00);
        assert_eq!(TypeTag::Bool as u8, 0x01);
        assert_eq!(TypeTag::U8 as u8, 0x02);
        assert_eq!(TypeTag::U64 as u8, 0x05);
        assert_eq!(TypeTag::I8 as u8, 0x06);
        assert_eq!(TypeTag::I32 as u8, 0x08);
        assert_eq!(TypeTag::F64 as u8, 0x0B);
        assert_eq!(TypeTag::String as u8, 0x0C);
        assert_eq!(TypeTag::Array as u8, 0x0D);
        assert_eq!(TypeTag::Struct as u8, 0x0E);
    }

    #[test]
    fn from_u8_roundtrips_all_tags() {
        for code in 0x00..=0x0E {
            let tag = TypeTag::from_u8(code).unwrap();
            assert_eq!(tag as u8, code);
        }
    }

    #[test]
    fn reserved_codes_fail() {
        for code in [0x0Fu8, 0x10, 0x80, 0xFF] {
            let err = TypeTag::from_u8(code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidTypeTag);
        }
    }

    #[test]
    fn unsigned_widening_chain() {
        assert!(TypeTag::U8.widens_to(TypeTag::U16));
        assert!(TypeTag::U8.widens_to(TypeTag::U64));
        assert!(TypeTag::U16.widens_to(TypeTag::U32));
        assert!(TypeTag::U32.widens_to(TypeTag::U64));
        assert!(!TypeTag::U64.widens_to(TypeTag::U32));
        assert!(!TypeTag::U16.widens_to(TypeTag::U8));
    }

    #[test]
    fn signed_widening_chain() {
        assert!(TypeTag::I8.widens_to(TypeTag::I64));
        assert!(TypeTag::I16.widens_to(TypeTag::I32));
        assert!(!TypeTag::I64.widens_to(TypeTag::I8));
    }

    #[test]
    fn no_cross_kind_widening() {
        assert!(!TypeTag::U8.widens_to(TypeTag::I16));
        assert!(!TypeTag::I8.widens_to(TypeTag::U16));
        assert!(!TypeTag::U32.widens_to(TypeTag::F64));
        assert!(!TypeTag::I32.widens_to(TypeTag::String));
        assert!(!TypeTag::U32.widens_to(TypeTag::F32));
    }

    #[test]
    fn float_widening() {
        assert!(TypeTag::F32.widens_to(TypeTag::F64));
        assert!(!TypeTag::F64.widens_to(TypeTag::F32));
    }

    #[test]
    fn legacy_sizes_for_fixed_kinds() {
        assert_eq!(TypeTag::Null.legacy_size(), Some(0));
        assert_eq!(TypeTag::Bool.legacy_size(), Some(1));
        assert_eq!(TypeTag::U16.legacy_size(), Some(2));
        assert_eq!(TypeTag::I32.legacy_size(), Some(4));
        assert_eq!(TypeTag::F64.legacy_size(), Some(8));
        assert_eq!(TypeTag::String.legacy_size(), None);
        assert_eq!(TypeTag::Struct.legacy_size(), None);
        assert!(TypeTag::F32.is_float());
        assert!(!TypeTag::U32.is_float());
    }

    #[test]
    fn exact_kinds_match_themselves_only() {
        for tag in [TypeTag::Bool, TypeTag::String, TypeTag::Array, TypeTag::Struct] {
            assert!(tag.widens_to(tag));
            assert!(!tag.widens_to(TypeTag::U64));
            assert!(!TypeTag::U64.widens_to(tag));
        }
    }
}
