use super::{MappingFact, SchemeId, TableFact};
use crate::schema::EntityType;
use crate::Result;

use std::path::PathBuf;

/// A pluggable source of mapping facts.
///
/// Providers are leaf components: they know how to read facts for a
/// (type, scheme) pair and nothing about how plans are built from them.
pub trait MappingProvider: Send + Sync {
    /// Loads or merges configuration documents. Returns `true` if the
    /// provider accepted any of them.
    fn set_config(&mut self, paths: &[PathBuf]) -> bool {
        let _ = paths;
        false
    }

    /// Fills `info` with the facts known for `info.ty` / `info.scheme`.
    ///
    /// Returns `true` if anything was found. Providers must not record more
    /// than one fact per member.
    fn extract_info(&self, info: &mut ExtractInfo) -> Result<bool>;
}

/// The facts collected for one (type, scheme) pair.
#[derive(Debug)]
pub struct ExtractInfo {
    pub ty: &'static EntityType,

    pub scheme: SchemeId,

    /// Member facts, at most one per member
    pub facts: Vec<MemberFact>,

    pub table: Option<TableFact>,
}

#[derive(Debug, Clone)]
pub struct MemberFact {
    /// Index into `EntityType::members`
    pub member: usize,

    pub fact: MappingFact,
}

impl ExtractInfo {
    pub fn new(ty: &'static EntityType, scheme: SchemeId) -> ExtractInfo {
        ExtractInfo {
            ty,
            scheme,
            facts: vec![],
            table: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.table.is_none()
    }

    /// Drops everything collected so far.
    pub fn clear(&mut self) {
        self.facts.clear();
        self.table = None;
    }

    pub fn push(&mut self, member: usize, fact: MappingFact) {
        debug_assert!(
            !self.facts.iter().any(|f| f.member == member),
            "duplicate fact for member {member}"
        );
        self.facts.push(MemberFact { member, fact });
    }
}
