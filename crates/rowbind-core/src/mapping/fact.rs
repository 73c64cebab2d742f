use super::SchemeId;
use crate::schema::EntityRef;

/// One mapping fact for one member under one scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingFact {
    /// Scalar binding to a source column
    Column(ColumnFact),

    /// Nested single object read from the same row
    Complex(ComplexFact),

    /// Nested collection of related child rows
    Relation(RelationFact),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFact {
    /// Source column name. Defaults to the member name.
    pub column: Option<String>,

    pub scheme: SchemeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexFact {
    pub scheme: SchemeId,

    /// Scheme used to extract the nested object
    pub nested_scheme: SchemeId,

    /// Type of the nested object. Inferred from the member when unset.
    pub item: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationFact {
    /// Relation name used to navigate from a parent row to its child rows
    pub name: String,

    pub scheme: SchemeId,

    /// Scheme used to extract each child
    pub nested_scheme: SchemeId,

    /// Type of each child. Inferred from the collection's element type when unset.
    pub item: Option<EntityRef>,

    /// Key columns on the parent row, in declared order
    pub parent_keys: Vec<String>,

    /// Key columns on the child row, pairwise with `parent_keys`
    pub child_keys: Vec<String>,
}

/// Identifies the physical table a type's scheme corresponds to.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFact {
    /// Schemes the fact applies to. Empty means every scheme.
    pub schemes: Vec<SchemeId>,

    pub name: String,
}

impl MappingFact {
    pub fn scheme(&self) -> SchemeId {
        match self {
            MappingFact::Column(fact) => fact.scheme,
            MappingFact::Complex(fact) => fact.scheme,
            MappingFact::Relation(fact) => fact.scheme,
        }
    }

    pub fn column(name: Option<&str>, scheme: impl Into<SchemeId>) -> MappingFact {
        MappingFact::Column(ColumnFact {
            column: name.map(str::to_string),
            scheme: scheme.into(),
        })
    }
}

impl TableFact {
    pub fn applies_to(&self, scheme: SchemeId) -> bool {
        self.schemes.is_empty() || self.schemes.contains(&scheme)
    }
}
