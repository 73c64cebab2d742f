mod builder;
pub use builder::Builder;

mod session;
pub use session::Session;

use crate::engine::{Arena, Exec, IdentityCache, PlanCache, PlanId};
use crate::provider::CompositeProvider;
use crate::{Config, ObjectBuilder, Plan, TypeRegistry};

use rowbind_core::mapping::MappingProvider;
use rowbind_core::{Cursor, EntityType, Error, Model, Object, Result, RowSet, SchemeId};

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Extracts typed objects from row sources.
///
/// Cloning a `Mapper` is cheap; clones share the plan cache.
#[derive(Clone)]
pub struct Mapper {
    shared: Arc<Shared>,
}

struct Shared {
    cache: PlanCache,
    provider: RwLock<CompositeProvider>,
    builder: Box<dyn ObjectBuilder>,
    registry: Arc<TypeRegistry>,
    config: Config,
}

impl Mapper {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.shared.registry
    }

    pub fn object_builder(&self) -> &dyn ObjectBuilder {
        &*self.shared.builder
    }

    /// Returns the plan for `T` under `scheme`, resolving it on first use.
    pub fn resolve<T: Model>(&self, scheme: impl Into<SchemeId>) -> Result<Arc<Plan>> {
        self.resolve_type(T::entity_type(), scheme)
    }

    pub fn resolve_type(
        &self,
        ty: &'static EntityType,
        scheme: impl Into<SchemeId>,
    ) -> Result<Arc<Plan>> {
        let (arena, id) = self.plan_for(ty, scheme.into())?;
        Ok(arena.plan(id).clone())
    }

    /// Looks up a plan referenced by another plan.
    pub fn plan(&self, id: PlanId) -> Option<Arc<Plan>> {
        self.shared.cache.snapshot().get(id).cloned()
    }

    /// Number of plans currently cached.
    pub fn cached_plans(&self) -> usize {
        self.shared.cache.len()
    }

    /// Extracts one row into a new `T`.
    pub fn fill_one<T: Model>(
        &self,
        source: &dyn RowSet,
        row: usize,
        scheme: impl Into<SchemeId>,
    ) -> Result<T> {
        let (arena, plan) = self.plan_for(T::entity_type(), scheme.into())?;
        let mut identity = IdentityCache::default();
        let mut exec = self.exec(&arena, &mut identity, &[]);

        // Nothing is constructed for a row that cannot be read
        exec.check_row(plan, source, row)?;

        let mut object = self.object_builder().create::<T>()?;
        exec.fill_row(plan, source, row, &mut object)?;
        Ok(object)
    }

    /// Extracts one row into an existing `T`. Members without a column in
    /// the source keep their current value.
    pub fn fill_one_into<T: Model>(
        &self,
        source: &dyn RowSet,
        row: usize,
        scheme: impl Into<SchemeId>,
        object: &mut T,
    ) -> Result<()> {
        self.fill_row(T::entity_type(), source, row, scheme.into(), object)
    }

    /// Extracts one row into `existing`, or into a new instance of `ty` when
    /// there is none.
    pub fn fill_one_dyn(
        &self,
        source: &dyn RowSet,
        row: usize,
        ty: &'static EntityType,
        scheme: impl Into<SchemeId>,
        existing: Option<Box<dyn Object>>,
    ) -> Result<Box<dyn Object>> {
        if let Some(object) = &existing {
            if object.object_type() != ty {
                return Err(Error::invalid_argument(format!(
                    "expected an instance of `{}`, found `{}`",
                    ty.name,
                    object.object_type().name
                )));
            }
        }

        let (arena, plan) = self.plan_for(ty, scheme.into())?;
        let mut identity = IdentityCache::default();
        let mut exec = self.exec(&arena, &mut identity, &[]);

        exec.check_row(plan, source, row)?;

        let mut object = match existing {
            Some(object) => object,
            None => self.shared.builder.create_instance(ty)?,
        };

        exec.fill_row(plan, source, row, &mut *object)?;
        Ok(object)
    }

    /// Extracts the cursor's current record into a new `T`.
    pub fn fill_current<T, C>(&self, cursor: &C, scheme: impl Into<SchemeId>) -> Result<T>
    where
        T: Model,
        C: Cursor + ?Sized,
    {
        let (arena, plan) = self.plan_for(T::entity_type(), scheme.into())?;
        let mut identity = IdentityCache::default();
        let mut exec = self.exec(&arena, &mut identity, &[]);

        exec.check_record(plan, cursor)?;

        let mut object = self.object_builder().create::<T>()?;
        exec.fill_record(plan, cursor, &mut object)?;

        Ok(object)
    }

    /// Like [`fill_list`](Mapper::fill_list), under the configured default
    /// scheme.
    pub fn fill<T: Model>(&self, source: &dyn RowSet, dest: &mut Vec<T>) -> Result<()> {
        self.fill_list(source, self.shared.config.default_scheme, dest)
    }

    /// Extracts every row of `source` and appends the objects to `dest`.
    pub fn fill_list<T: Model>(
        &self,
        source: &dyn RowSet,
        scheme: impl Into<SchemeId>,
        dest: &mut Vec<T>,
    ) -> Result<()> {
        self.fill_linked(source, &[], scheme, dest)
    }

    /// Like [`fill_list`](Mapper::fill_list), joining child collections the
    /// source cannot navigate against `related` on their key columns.
    pub fn fill_linked<'src, T: Model>(
        &self,
        source: &'src dyn RowSet,
        related: &[&'src dyn RowSet],
        scheme: impl Into<SchemeId>,
        dest: &mut Vec<T>,
    ) -> Result<()> {
        let (arena, plan) = self.plan_for(T::entity_type(), scheme.into())?;
        let mut identity = IdentityCache::default();

        self.exec(&arena, &mut identity, related)
            .fill_rows(plan, source, dest)
    }

    /// Reads a cursor to the end, appending one object per record.
    pub fn fill_cursor<T, C>(
        &self,
        cursor: &mut C,
        scheme: impl Into<SchemeId>,
        dest: &mut Vec<T>,
    ) -> Result<()>
    where
        T: Model,
        C: Cursor + ?Sized,
    {
        self.fill_cursor_filtered(cursor, scheme, dest, |_| true)
    }

    /// Reads a cursor to the end, appending one object per record accepted
    /// by `filter`.
    pub fn fill_cursor_filtered<T, C, F>(
        &self,
        cursor: &mut C,
        scheme: impl Into<SchemeId>,
        dest: &mut Vec<T>,
        mut filter: F,
    ) -> Result<()>
    where
        T: Model,
        C: Cursor + ?Sized,
        F: FnMut(&C) -> bool,
    {
        let (arena, plan) = self.plan_for(T::entity_type(), scheme.into())?;
        let mut identity = IdentityCache::default();
        let mut exec = self.exec(&arena, &mut identity, &[]);

        while cursor.advance()? {
            if !filter(&*cursor) {
                continue;
            }

            exec.check_record(plan, &*cursor)?;

            let mut object = self.object_builder().create::<T>()?;
            exec.fill_record(plan, &*cursor, &mut object)?;
            dest.push(object);
        }

        Ok(())
    }

    /// Starts a session whose identity cache spans several fills.
    pub fn session<'src>(&self) -> Session<'src> {
        Session::new(self.clone())
    }

    /// Drops every cached plan.
    pub fn clear_cache(&self) {
        self.shared.cache.clear();
    }

    /// Loads schema documents into the providers and drops every cached
    /// plan. Returns `true` if any provider accepted a document.
    pub fn load_documents(&self, paths: &[PathBuf]) -> bool {
        let accepted = self
            .shared
            .provider
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_config(paths);

        self.clear_cache();
        accepted
    }

    fn plan_for(&self, ty: &'static EntityType, scheme: SchemeId) -> Result<(Arc<Arena>, PlanId)> {
        let provider = self
            .shared
            .provider
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        self.shared
            .cache
            .resolve(&*provider, ty, scheme, self.shared.config.max_depth)
    }

    fn fill_row(
        &self,
        ty: &'static EntityType,
        source: &dyn RowSet,
        row: usize,
        scheme: SchemeId,
        object: &mut dyn Object,
    ) -> Result<()> {
        let (arena, plan) = self.plan_for(ty, scheme)?;
        let mut identity = IdentityCache::default();

        self.exec(&arena, &mut identity, &[])
            .fill_row(plan, source, row, object)
    }

    fn exec<'x, 'src>(
        &'x self,
        arena: &'x Arena,
        identity: &'x mut IdentityCache<'src>,
        related: &'x [&'src dyn RowSet],
    ) -> Exec<'x, 'src> {
        Exec::new(
            arena,
            &*self.shared.builder,
            self.shared.config.max_depth,
            identity,
            related,
        )
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("config", &self.shared.config)
            .field("types", &self.shared.registry.len())
            .field("plans", &self.shared.cache.len())
            .finish()
    }
}
