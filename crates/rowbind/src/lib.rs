// Lets code generated by the derives refer to this crate as `rowbind` from
// within its own unit tests.
extern crate self as rowbind;

mod builder;
pub use builder::{DefaultObjectBuilder, ObjectBuilder};

mod config;
pub use config::Config;

mod engine;
pub use engine::{KeyInfo, MemberBinding, ParentRelation, Plan, PlanId, RelationBinding};

mod mapper;
pub use mapper::{Builder, Mapper, Session};

pub mod memory;

pub mod provider;

mod registry;
pub use registry::TypeRegistry;

pub use rowbind_core::{
    bail, err, mapping,
    object::{AnyObject, ObjectList},
    schema, source, value, Collection, Column, Cursor, EntityType, Error, MappingFact,
    MappingProvider, Model, Object, Primitive, Record, RelatedRows, Result, RowRef, RowSet,
    SchemeId, Type, Value,
};
pub use rowbind_macros::{Enum, Model};

#[doc(hidden)]
pub mod codegen_support {
    pub use rowbind_core::{
        mapping::{ColumnFact, ComplexFact, MappingFact, RelationFact, SchemeId, TableFact},
        object::{CollectionSlot, ComplexSlot},
        schema::{EntityRef, EntityType, MemberTy},
        Collection, Error, Model, Object, Primitive, Result, Type, Value,
    };
    pub use std::any::Any;
}
