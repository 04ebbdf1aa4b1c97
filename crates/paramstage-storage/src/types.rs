//! Core storage types.
//!
//! Every value a medium stores is one of a small closed set of primitive
//! kinds. [`StoredValue`] is that set, and [`StorageValue`] maps Rust
//! primitives onto it so file handles can offer typed reads and writes.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// FILE MODE
// =============================================================================

/// Mode in which a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileMode {
    /// Read an existing file.
    Read,
    /// Replace the file's contents.
    Write,
    /// Add to or update the file's existing contents.
    Append,
}

impl FileMode {
    /// Returns true if the mode permits writes.
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Write | Self::Append)
    }
}

// =============================================================================
// STORED VALUES
// =============================================================================

/// Primitive kinds a storage medium understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// Single precision float.
    F32,
    /// Double precision float.
    F64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// A single value as held by a storage medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    /// Signed 8-bit integer.
    I8(i8),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Single precision float.
    F32(f32),
    /// Double precision float.
    F64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    String(String),
}

impl StoredValue {
    /// Returns the primitive kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::I8(_) => ValueKind::I8,
            Self::U8(_) => ValueKind::U8,
            Self::I16(_) => ValueKind::I16,
            Self::U16(_) => ValueKind::U16,
            Self::I32(_) => ValueKind::I32,
            Self::U32(_) => ValueKind::U32,
            Self::I64(_) => ValueKind::I64,
            Self::U64(_) => ValueKind::U64,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
        }
    }

    /// Returns false for NaN and infinite floats, which no medium persists.
    pub fn is_storable(&self) -> bool {
        match self {
            Self::F32(v) => v.is_finite(),
            Self::F64(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
        }
    }
}

// =============================================================================
// TYPED ACCESS
// =============================================================================

/// A Rust primitive that maps onto exactly one [`ValueKind`].
pub trait StorageValue: Sized {
    /// The kind this type is stored as.
    const KIND: ValueKind;

    /// Wraps the value for storage.
    fn into_stored(self) -> StoredValue;

    /// Unwraps a stored value, or `None` if it has a different kind.
    fn from_stored(value: StoredValue) -> Option<Self>;
}

macro_rules! storage_value {
    ($ty:ty, $variant:ident) => {
        impl StorageValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_stored(self) -> StoredValue {
                StoredValue::$variant(self)
            }

            fn from_stored(value: StoredValue) -> Option<Self> {
                match value {
                    StoredValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

storage_value!(i8, I8);
storage_value!(u8, U8);
storage_value!(i16, I16);
storage_value!(u16, U16);
storage_value!(i32, I32);
storage_value!(u32, U32);
storage_value!(i64, I64);
storage_value!(u64, U64);
storage_value!(f32, F32);
storage_value!(f64, F64);
storage_value!(bool, Bool);
storage_value!(String, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(42u16.into_stored().kind(), ValueKind::U16);
        assert_eq!("x".to_string().into_stored().kind(), ValueKind::String);
        assert_eq!(true.into_stored().kind(), ValueKind::Bool);
    }

    #[test]
    fn test_from_stored_rejects_other_kinds() {
        assert_eq!(i32::from_stored(StoredValue::I32(-7)), Some(-7));
        assert_eq!(i32::from_stored(StoredValue::I64(-7)), None);
        assert_eq!(bool::from_stored(StoredValue::String("true".into())), None);
    }

    #[test]
    fn test_stored_value_json_shape() {
        let json = serde_json::to_string(&StoredValue::U8(3)).unwrap();
        assert_eq!(json, r#"{"kind":"u8","value":3}"#);
        let back: StoredValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StoredValue::U8(3));
    }

    #[test]
    fn test_non_finite_floats_are_not_storable() {
        assert!(StoredValue::F64(1.5).is_storable());
        assert!(StoredValue::String("nan".into()).is_storable());
        assert!(!StoredValue::F64(f64::NAN).is_storable());
        assert!(!StoredValue::F32(f32::INFINITY).is_storable());
        assert!(!StoredValue::F64(f64::NEG_INFINITY).is_storable());
    }

    #[test]
    fn test_file_mode_writable() {
        assert!(!FileMode::Read.is_writable());
        assert!(FileMode::Write.is_writable());
        assert!(FileMode::Append.is_writable());
    }
}
