mod error;
pub use error::{Error, IntoError};

pub mod mapping;
pub use mapping::{MappingFact, MappingProvider, SchemeId};

pub mod object;
pub use object::{Collection, Model, Object, Primitive};

pub mod schema;
pub use schema::{EntityRef, EntityType, Member, MemberTy};

pub mod source;
pub use source::{Column, Cursor, Record, RelatedRows, RowRef, RowSet};

pub mod value;
pub use value::{Type, Value};

/// A Result type alias that uses rowbind's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
