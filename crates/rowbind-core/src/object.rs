//! Runtime access to mappable values.
//!
//! The extraction engine never knows the concrete types it fills. It works
//! through [`Object`], which the `Model` derive implements by dispatching on
//! field indices recorded in the type's [`EntityType`].

mod collection;
pub use collection::{Collection, ObjectList};

mod primitive;
pub use primitive::Primitive;

mod slot;
pub use slot::{AnyObject, CollectionSlot, ComplexSlot};

use crate::schema::{Access, EntityType, Member};
use crate::{Error, Result, Value};

use std::any::Any;
use std::fmt;

pub trait Object: Any {
    fn object_type(&self) -> &'static EntityType;

    /// Assigns a scalar field. `Value::Null` stores the field's zero value.
    fn set_field(&mut self, field: usize, value: Value) -> Result<()>;

    /// Returns the nested object stored in `field`, creating it as `item`
    /// when the slot is empty.
    fn complex_mut(&mut self, field: usize, item: &'static EntityType) -> Result<&mut dyn Object>;

    fn collection_mut(&mut self, field: usize) -> Result<&mut dyn Collection>;

    /// Returns the base value stored in an `#[inherit]` field.
    fn base_mut(&mut self, field: usize) -> Result<&mut dyn Object>;

    fn clone_object(&self) -> Box<dyn Object>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A type generated by `#[derive(Model)]`.
pub trait Model: Object + Default + Clone {
    fn entity_type() -> &'static EntityType;
}

impl dyn Object {
    pub fn is<T: Model>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    pub fn downcast<T: Model>(self: Box<Self>) -> Result<T> {
        let name = self.object_type().name;

        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(Error::invalid_argument(format!(
                "expected `{}`, found `{name}`",
                T::entity_type().name
            ))),
        }
    }

    /// Resolves `member` to the object that physically holds it and the
    /// field index within that object.
    pub fn locate(&mut self, member: &Member) -> Result<(&mut dyn Object, usize)> {
        match member.access {
            Access::Field(field) => Ok((self, field)),
            Access::Inherited {
                field,
                base,
                member: index,
            } => {
                let Some(inner) = base.get().member(index) else {
                    return Err(Error::invalid_argument(format!(
                        "`{}` has no member #{index}",
                        base.get().name
                    )));
                };

                self.base_mut(field)?.locate(inner)
            }
        }
    }

    pub fn set_member(&mut self, member: &Member, value: Value) -> Result<()> {
        let (target, field) = self.locate(member)?;
        target.set_field(field, value)
    }

    pub fn complex_member_mut(
        &mut self,
        member: &Member,
        item: &'static EntityType,
    ) -> Result<&mut dyn Object> {
        let (target, field) = self.locate(member)?;
        target.complex_mut(field, item)
    }

    pub fn collection_member_mut(&mut self, member: &Member) -> Result<&mut dyn Collection> {
        let (target, field) = self.locate(member)?;
        target.collection_mut(field)
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl fmt::Debug for dyn Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.object_type().name)
    }
}
