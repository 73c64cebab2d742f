use super::{KeyInfo, Routine, SourceKind};

use rowbind_core::mapping::TableFact;
use rowbind_core::schema::Member;
use rowbind_core::{EntityType, SchemeId};

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Index of a plan in the plan arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(pub(crate) usize);

/// How to populate one type under one scheme.
///
/// Plans are immutable once published by the cache. Routines are compiled
/// lazily, once per source kind.
#[derive(Clone)]
pub struct Plan {
    pub(crate) id: PlanId,

    pub(crate) ty: &'static EntityType,

    pub(crate) scheme: SchemeId,

    /// Scalar bindings in member declaration order
    pub(crate) members: Vec<MemberBinding>,

    /// Nested single objects read from the same row
    pub(crate) complex: Vec<RelationBinding>,

    /// Nested collections read from related rows
    pub(crate) children: Vec<RelationBinding>,

    /// Every child edge, anywhere in a resolved tree, that targets this plan
    pub(crate) relations_from_parent: Vec<ParentRelation>,

    /// Distinct keys of the children this plan owns
    pub(crate) primary_keys: Vec<Arc<KeyInfo>>,

    /// Distinct keys of the relations pointing at this plan
    pub(crate) foreign_keys: Vec<Arc<KeyInfo>>,

    pub(crate) table: Option<TableFact>,

    pub(crate) row_routine: OnceLock<Routine>,

    pub(crate) cursor_routine: OnceLock<Routine>,
}

/// A scalar member bound to a source column.
#[derive(Debug, Clone)]
pub struct MemberBinding {
    pub column: String,

    /// Index into the type's members
    pub member: usize,
}

/// A member bound to a nested plan.
#[derive(Debug, Clone)]
pub struct RelationBinding {
    /// Relation name; `None` for complex members
    pub name: Option<String>,

    pub member: usize,

    pub plan: PlanId,

    /// Type the nested plan populates
    pub item: &'static EntityType,

    /// Key columns linking parent and child rows
    pub key: Option<Arc<KeyInfo>>,
}

/// A child edge as seen from its target plan.
#[derive(Debug, Clone)]
pub struct ParentRelation {
    pub parent: PlanId,

    /// Member of the parent type holding the collection
    pub member: usize,

    pub name: String,

    pub key: Option<Arc<KeyInfo>>,
}

impl Plan {
    pub(crate) fn new(id: PlanId, ty: &'static EntityType, scheme: SchemeId) -> Plan {
        Plan {
            id,
            ty,
            scheme,
            members: vec![],
            complex: vec![],
            children: vec![],
            relations_from_parent: vec![],
            primary_keys: vec![],
            foreign_keys: vec![],
            table: None,
            row_routine: OnceLock::new(),
            cursor_routine: OnceLock::new(),
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn ty(&self) -> &'static EntityType {
        self.ty
    }

    pub fn scheme(&self) -> SchemeId {
        self.scheme
    }

    pub fn members(&self) -> &[MemberBinding] {
        &self.members
    }

    pub fn complex(&self) -> &[RelationBinding] {
        &self.complex
    }

    pub fn children(&self) -> &[RelationBinding] {
        &self.children
    }

    pub fn relations_from_parent(&self) -> &[ParentRelation] {
        &self.relations_from_parent
    }

    pub fn primary_keys(&self) -> &[Arc<KeyInfo>] {
        &self.primary_keys
    }

    pub fn foreign_keys(&self) -> &[Arc<KeyInfo>] {
        &self.foreign_keys
    }

    pub fn table(&self) -> Option<&TableFact> {
        self.table.as_ref()
    }

    pub fn member(&self, index: usize) -> &'static Member {
        &self.ty.members[index]
    }

    /// Returns `true` if the plan binds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.complex.is_empty() && self.children.is_empty()
    }

    pub(crate) fn routine(&self, kind: SourceKind) -> &Routine {
        match kind {
            SourceKind::RowSet => self
                .row_routine
                .get_or_init(|| Routine::compile(self, kind)),
            SourceKind::Cursor => self
                .cursor_routine
                .get_or_init(|| Routine::compile(self, kind)),
        }
    }

    /// Appends a parent edge unless it is already recorded, keeping the
    /// foreign key list in step.
    pub(crate) fn add_parent_relation(&mut self, relation: ParentRelation) {
        let exists = self
            .relations_from_parent
            .iter()
            .any(|r| r.parent == relation.parent && r.member == relation.member);

        if exists {
            return;
        }

        if let Some(key) = &relation.key {
            if !self.foreign_keys.iter().any(|k| k == key) {
                self.foreign_keys.push(key.clone());
            }
        }

        self.relations_from_parent.push(relation);
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("id", &self.id)
            .field("ty", &self.ty.name)
            .field("scheme", &self.scheme)
            .field("members", &self.members)
            .field("complex", &self.complex)
            .field("children", &self.children)
            .field("relations_from_parent", &self.relations_from_parent)
            .field("table", &self.table)
            .finish()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.ty.name, self.scheme)
    }
}
