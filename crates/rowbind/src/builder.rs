use rowbind_core::{EntityType, Model, Object, Result};

/// Creates bare instances of mapped types.
pub trait ObjectBuilder: Send + Sync {
    fn create_instance(&self, ty: &'static EntityType) -> Result<Box<dyn Object>>;
}

impl dyn ObjectBuilder + '_ {
    pub fn create<T: Model>(&self) -> Result<T> {
        self.create_instance(T::entity_type())?.downcast()
    }
}

/// Builds instances with the type's `Default` implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultObjectBuilder;

impl ObjectBuilder for DefaultObjectBuilder {
    fn create_instance(&self, ty: &'static EntityType) -> Result<Box<dyn Object>> {
        Ok(ty.construct())
    }
}
