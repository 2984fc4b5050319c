//! The PLY primitive type registry and decoded scalar values.

use std::fmt;
use std::str::FromStr;

use byteorder::ByteOrder;

use crate::PlyError;

/// PLY scalar data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    /// Looks up a header type name, accepting both the classic names and the
    /// width-suffixed aliases.
    pub fn parse(s: &str) -> Result<Self, PlyError> {
        match s {
            "char" | "int8" => Ok(ScalarType::I8),
            "uchar" | "uint8" => Ok(ScalarType::U8),
            "short" | "int16" => Ok(ScalarType::I16),
            "ushort" | "uint16" => Ok(ScalarType::U16),
            "int" | "int32" => Ok(ScalarType::I32),
            "uint" | "uint32" => Ok(ScalarType::U32),
            "float" | "float32" => Ok(ScalarType::F32),
            "double" | "float64" => Ok(ScalarType::F64),
            _ => Err(PlyError::UnknownType {
                name: s.to_string(),
            }),
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::F32 | ScalarType::F64)
    }

    /// Decodes one value from the front of `bytes`, which must hold at least
    /// [`size_bytes`](Self::size_bytes) bytes.
    pub(crate) fn read_binary<E: ByteOrder>(&self, bytes: &[u8]) -> ScalarValue {
        match self {
            ScalarType::I8 => ScalarValue::I8(bytes[0] as i8),
            ScalarType::U8 => ScalarValue::U8(bytes[0]),
            ScalarType::I16 => ScalarValue::I16(E::read_i16(bytes)),
            ScalarType::U16 => ScalarValue::U16(E::read_u16(bytes)),
            ScalarType::I32 => ScalarValue::I32(E::read_i32(bytes)),
            ScalarType::U32 => ScalarValue::U32(E::read_u32(bytes)),
            ScalarType::F32 => ScalarValue::F32(E::read_f32(bytes)),
            ScalarType::F64 => ScalarValue::F64(E::read_f64(bytes)),
        }
    }

    /// Parses one whitespace-free ascii token as this type.
    pub(crate) fn parse_ascii(&self, token: &str) -> Result<ScalarValue, PlyError> {
        let invalid = || PlyError::InvalidValue {
            token: token.to_string(),
            data_type: *self,
        };
        Ok(match self {
            ScalarType::I8 => ScalarValue::I8(token.parse().map_err(|_| invalid())?),
            ScalarType::U8 => ScalarValue::U8(token.parse().map_err(|_| invalid())?),
            ScalarType::I16 => ScalarValue::I16(token.parse().map_err(|_| invalid())?),
            ScalarType::U16 => ScalarValue::U16(token.parse().map_err(|_| invalid())?),
            ScalarType::I32 => ScalarValue::I32(token.parse().map_err(|_| invalid())?),
            ScalarType::U32 => ScalarValue::U32(token.parse().map_err(|_| invalid())?),
            ScalarType::F32 => ScalarValue::F32(token.parse().map_err(|_| invalid())?),
            ScalarType::F64 => ScalarValue::F64(token.parse().map_err(|_| invalid())?),
        })
    }
}

impl FromStr for ScalarType {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::I8 => "char",
            ScalarType::U8 => "uchar",
            ScalarType::I16 => "short",
            ScalarType::U16 => "ushort",
            ScalarType::I32 => "int",
            ScalarType::U32 => "uint",
            ScalarType::F32 => "float",
            ScalarType::F64 => "double",
        };
        f.write_str(name)
    }
}

/// A single decoded value, kept in the natural Rust type of its declared
/// PLY type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl ScalarValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::I8(_) => ScalarType::I8,
            ScalarValue::U8(_) => ScalarType::U8,
            ScalarValue::I16(_) => ScalarType::I16,
            ScalarValue::U16(_) => ScalarType::U16,
            ScalarValue::I32(_) => ScalarType::I32,
            ScalarValue::U32(_) => ScalarType::U32,
            ScalarValue::F32(_) => ScalarType::F32,
            ScalarValue::F64(_) => ScalarType::F64,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match *self {
            ScalarValue::I8(v) => v as f64,
            ScalarValue::U8(v) => v as f64,
            ScalarValue::I16(v) => v as f64,
            ScalarValue::U16(v) => v as f64,
            ScalarValue::I32(v) => v as f64,
            ScalarValue::U32(v) => v as f64,
            ScalarValue::F32(v) => v as f64,
            ScalarValue::F64(v) => v,
        }
    }

    /// Returns the value as an integer, or `None` for float types.
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            ScalarValue::I8(v) => Some(v as i64),
            ScalarValue::U8(v) => Some(v as i64),
            ScalarValue::I16(v) => Some(v as i64),
            ScalarValue::U16(v) => Some(v as i64),
            ScalarValue::I32(v) => Some(v as i64),
            ScalarValue::U32(v) => Some(v as i64),
            ScalarValue::F32(_) | ScalarValue::F64(_) => None,
        }
    }

    /// Interprets the value as a list length prefix.
    pub(crate) fn to_list_len(&self) -> Result<usize, PlyError> {
        self.to_i64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or(PlyError::InvalidListLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn test_scalar_type_parsing() {
        assert_eq!(ScalarType::parse("float").unwrap(), ScalarType::F32);
        assert_eq!(ScalarType::parse("float32").unwrap(), ScalarType::F32);
        assert_eq!(ScalarType::parse("double").unwrap(), ScalarType::F64);
        assert_eq!(ScalarType::parse("int").unwrap(), ScalarType::I32);
        assert_eq!(ScalarType::parse("uchar").unwrap(), ScalarType::U8);
        assert_eq!(ScalarType::parse("uint8").unwrap(), ScalarType::U8);
        assert_eq!("int16".parse::<ScalarType>().unwrap(), ScalarType::I16);

        assert!(matches!(
            ScalarType::parse("invalid_type"),
            Err(PlyError::UnknownType { name }) if name == "invalid_type"
        ));
        // Names are case sensitive.
        assert!(ScalarType::parse("Float").is_err());
    }

    #[test]
    fn test_sizes() {
        let sizes: Vec<usize> = ["char", "uchar", "short", "ushort", "int", "uint", "float", "double"]
            .iter()
            .map(|n| ScalarType::parse(n).unwrap().size_bytes())
            .collect();
        assert_eq!(sizes, vec![1, 1, 2, 2, 4, 4, 4, 8]);
    }

    #[test]
    fn test_read_binary_endianness() {
        let le = 0x0102_0304u32.to_le_bytes();
        let be = 0x0102_0304u32.to_be_bytes();
        assert_eq!(
            ScalarType::U32.read_binary::<LittleEndian>(&le),
            ScalarValue::U32(0x0102_0304)
        );
        assert_eq!(
            ScalarType::U32.read_binary::<BigEndian>(&be),
            ScalarValue::U32(0x0102_0304)
        );
        assert_eq!(
            ScalarType::I8.read_binary::<BigEndian>(&[0xff]),
            ScalarValue::I8(-1)
        );
        assert_eq!(
            ScalarType::F64.read_binary::<BigEndian>(&1.5f64.to_be_bytes()),
            ScalarValue::F64(1.5)
        );
    }

    #[test]
    fn test_parse_ascii() {
        assert_eq!(
            ScalarType::F32.parse_ascii("0.5").unwrap(),
            ScalarValue::F32(0.5)
        );
        assert_eq!(ScalarType::I16.parse_ascii("-7").unwrap(), ScalarValue::I16(-7));
        assert!(matches!(
            ScalarType::U8.parse_ascii("256"),
            Err(PlyError::InvalidValue { data_type: ScalarType::U8, .. })
        ));
        assert!(ScalarType::I32.parse_ascii("1.0").is_err());
    }

    #[test]
    fn test_list_len() {
        assert_eq!(ScalarValue::U8(4).to_list_len().unwrap(), 4);
        assert!(ScalarValue::I8(-1).to_list_len().is_err());
        assert!(ScalarValue::F32(3.0).to_list_len().is_err());
    }
}
