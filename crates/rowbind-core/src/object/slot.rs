//! Adapters between field types and the [`Object`] accessors.
//!
//! Generated code asks these traits for the nested type a field holds and
//! for mutable access to it, so the derive does not need to understand
//! wrapper types syntactically.

use super::{Collection, Model, Object, ObjectList};
use crate::schema::{EntityRef, EntityType};
use crate::{Error, Result};

use std::collections::VecDeque;

/// A field holding a single nested object.
pub trait ComplexSlot {
    /// The nested type, if the field declares one.
    fn item_type() -> Option<EntityRef>;

    fn get_or_insert(&mut self, item: &'static EntityType) -> Result<&mut dyn Object>;
}

/// A field holding a collection of nested objects.
pub trait CollectionSlot {
    /// The element type, if the field declares one.
    fn item_type() -> Option<EntityRef>;

    /// Returns the collection, allocating it if the field is empty.
    fn collection(&mut self) -> &mut dyn Collection;
}

/// A nested object whose type is decided by mapping configuration.
#[derive(Debug, Clone, Default)]
pub struct AnyObject(pub Option<Box<dyn Object>>);

fn check_item<T: Model>(item: &'static EntityType) -> Result<()> {
    if item.is::<T>() {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "cannot store `{}` in a field of type `{}`",
            item.name,
            T::entity_type().name
        )))
    }
}

impl<T: Model> ComplexSlot for Box<T> {
    fn item_type() -> Option<EntityRef> {
        Some(EntityRef::of::<T>())
    }

    fn get_or_insert(&mut self, item: &'static EntityType) -> Result<&mut dyn Object> {
        check_item::<T>(item)?;
        Ok(&mut **self)
    }
}

impl<T: Model> ComplexSlot for Option<T> {
    fn item_type() -> Option<EntityRef> {
        Some(EntityRef::of::<T>())
    }

    fn get_or_insert(&mut self, item: &'static EntityType) -> Result<&mut dyn Object> {
        check_item::<T>(item)?;
        Ok(self.get_or_insert_with(T::default))
    }
}

impl ComplexSlot for AnyObject {
    fn item_type() -> Option<EntityRef> {
        None
    }

    fn get_or_insert(&mut self, item: &'static EntityType) -> Result<&mut dyn Object> {
        if let Some(existing) = &self.0 {
            if existing.object_type() != item {
                return Err(Error::invalid_argument(format!(
                    "slot already holds a `{}`, cannot reuse it as `{}`",
                    existing.object_type().name,
                    item.name
                )));
            }
        }

        Ok(&mut **self.0.get_or_insert_with(|| item.construct()))
    }
}

impl<T: Model> CollectionSlot for Vec<T> {
    fn item_type() -> Option<EntityRef> {
        Some(EntityRef::of::<T>())
    }

    fn collection(&mut self) -> &mut dyn Collection {
        self
    }
}

impl<T: Model> CollectionSlot for VecDeque<T> {
    fn item_type() -> Option<EntityRef> {
        Some(EntityRef::of::<T>())
    }

    fn collection(&mut self) -> &mut dyn Collection {
        self
    }
}

impl<T: Model> CollectionSlot for Option<Vec<T>> {
    fn item_type() -> Option<EntityRef> {
        Some(EntityRef::of::<T>())
    }

    fn collection(&mut self) -> &mut dyn Collection {
        self.get_or_insert_with(Vec::new)
    }
}

impl CollectionSlot for ObjectList {
    fn item_type() -> Option<EntityRef> {
        None
    }

    fn collection(&mut self) -> &mut dyn Collection {
        self
    }
}

impl CollectionSlot for Option<ObjectList> {
    fn item_type() -> Option<EntityRef> {
        None
    }

    fn collection(&mut self) -> &mut dyn Collection {
        self.get_or_insert_with(ObjectList::default)
    }
}
