use super::Mapper;
use crate::engine::IdentityCache;

use rowbind_core::{Collection, EntityType, Result, RowSet, SchemeId};

/// A sequence of fills sharing one identity cache.
///
/// A row reached again under the same type and scheme, by any fill of the
/// session, yields a copy of the object extracted the first time.
pub struct Session<'src> {
    mapper: Mapper,
    identity: IdentityCache<'src>,
    related: Vec<&'src dyn RowSet>,
}

impl<'src> Session<'src> {
    pub(super) fn new(mapper: Mapper) -> Session<'src> {
        Session {
            mapper,
            identity: IdentityCache::default(),
            related: vec![],
        }
    }

    /// Adds tables that child collections are joined against when a source
    /// cannot navigate a relation itself.
    pub fn with_related<I>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = &'src dyn RowSet>,
    {
        self.related.extend(tables);
        self
    }

    /// Extracts every row of `source` into `dest`, optionally forgetting the
    /// objects extracted by earlier fills first.
    pub fn fill_list(
        &mut self,
        source: &'src dyn RowSet,
        ty: &'static EntityType,
        scheme: impl Into<SchemeId>,
        dest: &mut dyn Collection,
        clear_identity_cache: bool,
    ) -> Result<()> {
        if clear_identity_cache {
            self.identity.clear();
        }

        self.fill_list_nested(source, ty, scheme, dest)
    }

    /// Extracts every row of `source` into `dest`, reusing the objects
    /// extracted by earlier fills.
    pub fn fill_list_nested(
        &mut self,
        source: &'src dyn RowSet,
        ty: &'static EntityType,
        scheme: impl Into<SchemeId>,
        dest: &mut dyn Collection,
    ) -> Result<()> {
        let (arena, plan) = self.mapper.plan_for(ty, scheme.into())?;

        self.mapper
            .exec(&arena, &mut self.identity, &self.related)
            .retaining_roots()
            .fill_rows(plan, source, dest)
    }

    pub fn clear_identity_cache(&mut self) {
        self.identity.clear();
    }

    /// Number of objects in the identity cache.
    pub fn cached_objects(&self) -> usize {
        self.identity.len()
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }
}
