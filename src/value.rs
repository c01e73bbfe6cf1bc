//! Runtime values for encoding/decoding (codec representation).

use crate::schema::FieldType;

/// A single typed field value, one variant per wire type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Byte(u8),
    Short(i16),
    Float(f32),
    Int(i32),
}

impl Value {
    /// The wire type this value encodes as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Byte(_) => FieldType::Byte,
            Value::Short(_) => FieldType::Short,
            Value::Float(_) => FieldType::Float,
            Value::Int(_) => FieldType::Int,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Value::Short(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Widening integer view for display; `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(x) => Some(*x as i64),
            Value::Short(x) => Some(*x as i64),
            Value::Int(x) => Some(*x as i64),
            Value::Float(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Byte(x) => write!(f, "{}", x),
            Value::Short(x) => write!(f, "{}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Int(x) => write!(f, "{}", x),
        }
    }
}
