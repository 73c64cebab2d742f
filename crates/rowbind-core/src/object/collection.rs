use super::{Model, Object};
use crate::{Error, Result};

use std::collections::VecDeque;

/// A growable destination for nested objects.
pub trait Collection {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current capacity, for collections that track one.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// Makes room for `additional` more items.
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }

    /// Appends `item`. Fails if the item is not of the element type.
    fn push_object(&mut self, item: Box<dyn Object>) -> Result<()>;

    fn clear(&mut self);
}

/// An untyped list of objects. Used where the element type is decided by
/// mapping configuration rather than by the field's declared type.
#[derive(Debug, Clone, Default)]
pub struct ObjectList(pub Vec<Box<dyn Object>>);

fn downcast_item<T: Model>(item: Box<dyn Object>) -> Result<T> {
    item.downcast::<T>()
        .map_err(|err| err.context(Error::invalid_argument("collection item has the wrong type")))
}

impl<T: Model> Collection for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(Vec::capacity(self))
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    fn push_object(&mut self, item: Box<dyn Object>) -> Result<()> {
        self.push(downcast_item(item)?);
        Ok(())
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<T: Model> Collection for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(VecDeque::capacity(self))
    }

    fn reserve(&mut self, additional: usize) {
        VecDeque::reserve(self, additional);
    }

    fn push_object(&mut self, item: Box<dyn Object>) -> Result<()> {
        self.push_back(downcast_item(item)?);
        Ok(())
    }

    fn clear(&mut self) {
        VecDeque::clear(self);
    }
}

impl Collection for ObjectList {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.0.capacity())
    }

    fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    fn push_object(&mut self, item: Box<dyn Object>) -> Result<()> {
        self.0.push(item);
        Ok(())
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

impl ObjectList {
    pub fn iter(&self) -> impl Iterator<Item = &dyn Object> {
        self.0.iter().map(|item| &**item)
    }
}
