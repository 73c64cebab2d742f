use super::{Type, Value};
use crate::Result;

impl Type {
    /// Converts a non-null value to this type.
    ///
    /// Null passes through untouched, and so does a value that already has
    /// this type. Everything else goes through the `TryFrom<Value>`
    /// conversions of the target's Rust representation.
    pub fn convert(&self, value: Value) -> Result<Value> {
        if value.is_a(self) {
            return Ok(value);
        }

        Ok(match self {
            Type::Bool => Value::Bool(value.try_into()?),
            Type::I8 => Value::I8(value.try_into()?),
            Type::I16 => Value::I16(value.try_into()?),
            Type::I32 => Value::I32(value.try_into()?),
            Type::I64 => Value::I64(value.try_into()?),
            Type::U8 => Value::U8(value.try_into()?),
            Type::U16 => Value::U16(value.try_into()?),
            Type::U32 => Value::U32(value.try_into()?),
            Type::U64 => Value::U64(value.try_into()?),
            Type::F32 => Value::F32(value.try_into()?),
            Type::F64 => Value::F64(value.try_into()?),
            Type::String => Value::String(value.try_into()?),
            Type::Bytes => Value::Bytes(value.try_into()?),
            Type::Uuid => Value::Uuid(value.try_into()?),
            Type::DateTime => Value::DateTime(value.try_into()?),
            Type::Date => Value::Date(value.try_into()?),
        })
    }
}
