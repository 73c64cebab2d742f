use super::{Access, Member, MemberTy};
use crate::mapping::{MappingFact, TableFact};
use crate::object::{Model, Object};

use std::any::TypeId;
use std::fmt;

/// Describes a mappable type: its members in declaration order and the
/// mapping facts attached to them.
#[derive(Debug)]
pub struct EntityType {
    pub name: &'static str,

    pub type_id: TypeId,

    /// Own members first, then members reached through `#[inherit]` fields
    pub members: Vec<Member>,

    /// Table facts declared on the type
    pub tables: Vec<TableFact>,

    construct: fn() -> Box<dyn Object>,
}

/// A reference to another type's descriptor.
///
/// Descriptors reference each other (including themselves), so links built
/// by generated code are function pointers resolved on use.
#[derive(Clone, Copy)]
pub struct EntityRef(Target);

#[derive(Clone, Copy)]
enum Target {
    Lazy(fn() -> &'static EntityType),
    Resolved(&'static EntityType),
}

pub struct EntityTypeBuilder {
    ty: EntityType,
    inherits: Vec<(usize, EntityRef)>,
}

impl EntityType {
    pub fn builder<T: Model>(name: &'static str) -> EntityTypeBuilder {
        EntityTypeBuilder {
            ty: EntityType {
                name,
                type_id: TypeId::of::<T>(),
                members: vec![],
                tables: vec![],
                construct: || Box::new(T::default()),
            },
            inherits: vec![],
        }
    }

    /// Creates a fresh default instance.
    pub fn construct(&self) -> Box<dyn Object> {
        (self.construct)()
    }

    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Names of this type and of every type it inherits members from,
    /// most derived first.
    pub fn lineage(&self) -> Vec<&'static str> {
        let mut names = vec![self.name];

        for member in &self.members {
            if !names.contains(&member.declaring_type) {
                names.push(member.declaring_type);
            }
        }

        names
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityType {}

impl EntityRef {
    pub const fn new(get: fn() -> &'static EntityType) -> EntityRef {
        EntityRef(Target::Lazy(get))
    }

    /// Wraps an already resolved descriptor.
    pub const fn resolved(ty: &'static EntityType) -> EntityRef {
        EntityRef(Target::Resolved(ty))
    }

    pub fn of<T: Model>() -> EntityRef {
        EntityRef::new(T::entity_type)
    }

    pub fn get(&self) -> &'static EntityType {
        match self.0 {
            Target::Lazy(get) => get(),
            Target::Resolved(ty) => ty,
        }
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityRef").field(&self.get().name).finish()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.get().type_id == other.get().type_id
    }
}

impl EntityTypeBuilder {
    /// Declares an own field. `field` is the index the generated accessors
    /// dispatch on.
    pub fn field(
        mut self,
        field: usize,
        name: &'static str,
        ty: MemberTy,
        facts: Vec<MappingFact>,
    ) -> Self {
        let index = self.ty.members.len();
        let declaring_type = self.ty.name;

        self.ty.members.push(Member {
            index,
            name,
            declaring_type,
            access: Access::Field(field),
            ty,
            facts,
        });
        self
    }

    /// Flattens the members of the base type stored in `field`.
    pub fn inherit(mut self, field: usize, base: EntityRef) -> Self {
        self.inherits.push((field, base));
        self
    }

    pub fn table(mut self, table: TableFact) -> Self {
        self.ty.tables.push(table);
        self
    }

    pub fn build(mut self) -> EntityType {
        for (field, base) in std::mem::take(&mut self.inherits) {
            for inherited in &base.get().members {
                // A member redeclared on the derived type hides the base one
                if self.ty.member_by_name(inherited.name).is_some() {
                    continue;
                }

                let index = self.ty.members.len();

                self.ty.members.push(Member {
                    index,
                    name: inherited.name,
                    declaring_type: inherited.declaring_type,
                    access: Access::Inherited {
                        field,
                        base,
                        member: inherited.index,
                    },
                    ty: inherited.ty.clone(),
                    facts: inherited.facts.clone(),
                });
            }

            for table in &base.get().tables {
                if !self.ty.tables.iter().any(|t| t.schemes == table.schemes) {
                    self.ty.tables.push(table.clone());
                }
            }
        }

        self.ty
    }
}
