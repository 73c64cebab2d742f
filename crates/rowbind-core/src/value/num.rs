use super::Value;
use crate::{Error, Result};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

macro_rules! impl_int {
    ( $( $variant:ident($ty:ty) ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::$variant(*value)
                }
            }

            // Cross-type conversions go through an i128 view so range checks
            // are done once by `TryFrom`. Floats round half to even.
            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    if let Value::$variant(v) = value {
                        return Ok(v);
                    }

                    let converted = match &value {
                        Value::String(s) => s.trim().parse::<$ty>().ok(),
                        Value::F32(_) | Value::F64(_) => value
                            .to_f64()
                            .map(f64::round_ties_even)
                            .filter(|v| v.is_finite())
                            .and_then(|v| <$ty>::try_from(v as i128).ok()),
                        _ => value.to_i128().and_then(|v| <$ty>::try_from(v).ok()),
                    };

                    converted.ok_or_else(|| Error::type_conversion(value, stringify!($ty)))
                }
            }
        )*
    };
}

impl_int! {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => value.to_f64(),
        };

        converted.ok_or_else(|| Error::type_conversion(value, "f64"))
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        if let Value::F32(v) = value {
            return Ok(v);
        }

        let converted = match &value {
            Value::String(s) => s.trim().parse::<f32>().ok(),
            _ => value
                .to_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite()),
        };

        converted.ok_or_else(|| Error::type_conversion(value, "f32"))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Bool(v) => Some(*v),
            Value::String(s) => match s.trim() {
                s if s.eq_ignore_ascii_case("true") || s == "1" => Some(true),
                s if s.eq_ignore_ascii_case("false") || s == "0" => Some(false),
                _ => None,
            },
            _ => value.to_i128().map(|v| v != 0),
        };

        converted.ok_or_else(|| Error::type_conversion(value, "bool"))
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Ok(match value {
            Value::String(v) => v,
            Value::Bool(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Uuid(v) => v.hyphenated().to_string(),
            Value::DateTime(v) => v.to_string(),
            Value::Date(v) => v.to_string(),
            Value::Bytes(v) => match String::from_utf8(v) {
                Ok(s) => s,
                Err(err) => {
                    return Err(Error::type_conversion(
                        Value::Bytes(err.into_bytes()),
                        "String",
                    ))
                }
            },
            Value::Null => return Err(Error::type_conversion(value, "String")),
        })
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            Value::Uuid(v) => Ok(v.as_bytes().to_vec()),
            _ => Err(Error::type_conversion(value, "Vec<u8>")),
        }
    }
}

impl TryFrom<Value> for Uuid {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::String(v) => Ok(Uuid::parse_str(v.trim())?),
            Value::Bytes(v) => Ok(Uuid::from_slice(&v)?),
            _ => Err(Error::type_conversion(value, "Uuid")),
        }
    }
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl TryFrom<Value> for NaiveDateTime {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(v) => Ok(v.and_time(chrono::NaiveTime::MIN)),
            Value::String(ref s) => {
                let s = s.trim();
                DATE_TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                    .ok_or_else(|| Error::type_conversion(value.clone(), "NaiveDateTime"))
            }
            _ => Err(Error::type_conversion(value, "NaiveDateTime")),
        }
    }
}

impl TryFrom<Value> for NaiveDate {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            Value::String(v) => Ok(NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")?),
            _ => Err(Error::type_conversion(value, "NaiveDate")),
        }
    }
}
