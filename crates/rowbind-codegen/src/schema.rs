mod column;
pub(crate) use column::Column;

mod complex;
pub(crate) use complex::Complex;

mod enumeration;
pub(crate) use enumeration::{EnumVariant, PrimitiveEnum};

mod error;
pub(crate) use error::ErrorSet;

mod field;
pub(crate) use field::{Field, FieldKind};

mod model;
pub(crate) use model::Model;

mod relation;
pub(crate) use relation::Relation;

mod scheme;
pub(crate) use scheme::parse_scheme;

mod table;
pub(crate) use table::Table;
