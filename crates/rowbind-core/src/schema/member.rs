use super::EntityRef;
use crate::mapping::{MappingFact, SchemeId};
use crate::value::Type;

#[derive(Debug, Clone)]
pub struct Member {
    /// Position in `EntityType::members`
    pub index: usize,

    pub name: &'static str,

    /// Name of the type that declares the member. Differs from the owning
    /// type for inherited members.
    pub declaring_type: &'static str,

    pub access: Access,

    pub ty: MemberTy,

    /// Facts declared in code, across all schemes
    pub facts: Vec<MappingFact>,
}

/// How a member is reached from an instance of its owning type.
#[derive(Debug, Clone, Copy)]
pub enum Access {
    /// A field of the type itself
    Field(usize),

    /// A member of the base value stored in `field`
    Inherited {
        field: usize,
        base: EntityRef,
        member: usize,
    },
}

/// The value shape of a member.
#[derive(Debug, Clone)]
pub enum MemberTy {
    Scalar {
        ty: Type,
        nullable: bool,
    },

    /// A single nested object. `target` is `None` when the slot is untyped.
    Model { target: Option<EntityRef> },

    /// A collection of nested objects. `item` is `None` when the element
    /// type cannot be inferred.
    Collection { item: Option<EntityRef> },
}

impl Member {
    /// The fact declared for `scheme`, if any.
    pub fn fact(&self, scheme: SchemeId) -> Option<&MappingFact> {
        self.facts.iter().find(|fact| fact.scheme() == scheme)
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self.access, Access::Inherited { .. })
    }
}

impl MemberTy {
    pub fn is_scalar(&self) -> bool {
        matches!(self, MemberTy::Scalar { .. })
    }

    pub fn scalar_ty(&self) -> Option<Type> {
        match self {
            MemberTy::Scalar { ty, .. } => Some(*ty),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            MemberTy::Scalar { nullable, .. } => *nullable,
            _ => true,
        }
    }
}
