use rowbind_core::schema::{Access, EntityRef, MemberTy};
use rowbind_core::{EntityType, Error, Model, Result};

use indexmap::IndexMap;

/// Known model types by name.
///
/// Schema documents refer to types by name; the registry turns those names
/// back into descriptors. Registering a type also registers every type
/// reachable through its members.
///
/// Names must be unique: a name claimed by two different types resolves to
/// neither.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<&'static str, &'static EntityType>,

    /// Names registered by more than one type
    clashes: Vec<&'static str>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    pub fn register<T: Model>(&mut self) {
        self.register_type(T::entity_type());
    }

    pub fn register_type(&mut self, ty: &'static EntityType) {
        let mut pending = vec![ty];

        while let Some(ty) = pending.pop() {
            if let Some(existing) = self.types.get(ty.name) {
                if existing.type_id != ty.type_id && !self.clashes.contains(&ty.name) {
                    log::warn!("more than one registered type is named `{}`", ty.name);
                    self.clashes.push(ty.name);
                }

                continue;
            }

            self.types.insert(ty.name, ty);

            for member in &ty.members {
                let target = match &member.ty {
                    MemberTy::Model { target } => *target,
                    MemberTy::Collection { item } => *item,
                    MemberTy::Scalar { .. } => None,
                };

                if let Some(target) = target {
                    pending.push(target.get());
                }

                if let Access::Inherited { base, .. } = member.access {
                    pending.push(base.get());
                }

                for fact in &member.facts {
                    if let Some(item) = fact_item(fact) {
                        pending.push(item.get());
                    }
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static EntityType> {
        if self.clashes.contains(&name) {
            return None;
        }

        self.types.get(name).copied()
    }

    /// Fails if two registered types share a name.
    pub fn check(&self) -> Result<()> {
        match self.clashes.first() {
            Some(name) => Err(Error::invalid_mapping(format!(
                "more than one registered type is named `{name}`"
            ))),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static EntityType> + '_ {
        self.types.values().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn fact_item(fact: &rowbind_core::MappingFact) -> Option<EntityRef> {
    use rowbind_core::MappingFact::*;

    match fact {
        Column(_) => None,
        Complex(fact) => fact.item,
        Relation(fact) => fact.item,
    }
}
