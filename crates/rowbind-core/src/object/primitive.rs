use crate::value::Type;
use crate::{Result, Value};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// A scalar field type.
pub trait Primitive: Sized {
    const TYPE: Type;

    const NULLABLE: bool = false;

    /// Value stored when the source column is null.
    fn zero() -> Self;

    fn load(value: Value) -> Result<Self>;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $variant:ident, $zero:expr; )* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::$variant;

                fn zero() -> Self {
                    $zero
                }

                fn load(value: Value) -> Result<Self> {
                    if value.is_null() {
                        return Ok(Self::zero());
                    }

                    value.try_into()
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool, false;
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    String => String, String::new();
    Vec<u8> => Bytes, Vec::new();
    Uuid => Uuid, Uuid::nil();
    NaiveDateTime => DateTime, NaiveDateTime::default();
    NaiveDate => Date, NaiveDate::default();
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: Type = T::TYPE;

    const NULLABLE: bool = true;

    fn zero() -> Self {
        None
    }

    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::load(value).map(Some)
        }
    }
}
