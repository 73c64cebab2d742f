use super::{KeyId, KeyInfo, Plan, PlanId, Resolver};

use rowbind_core::mapping::MappingProvider;
use rowbind_core::{EntityType, Result, SchemeId};

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// An immutable set of resolved plans.
///
/// Plans refer to each other by index, so self-referential graphs need no
/// reference cycles.
#[derive(Debug, Default, Clone)]
pub(crate) struct Arena {
    pub(super) plans: Vec<Arc<Plan>>,
    pub(super) index: HashMap<(TypeId, SchemeId), PlanId>,
    pub(super) keys: HashMap<KeyId, Arc<KeyInfo>>,
}

/// Process-wide cache of resolved plans.
///
/// Readers work on a snapshot of the arena and never block each other.
/// Resolution is serialized: a new tree of plans is built against the
/// current snapshot and published in one step once it is complete, so a
/// half-built plan is never visible.
#[derive(Debug, Default)]
pub(crate) struct PlanCache {
    current: RwLock<Arc<Arena>>,
    resolving: Mutex<()>,
}

impl Arena {
    pub(crate) fn plan(&self, id: PlanId) -> &Arc<Plan> {
        &self.plans[id.0]
    }

    pub(crate) fn get(&self, id: PlanId) -> Option<&Arc<Plan>> {
        self.plans.get(id.0)
    }

    pub(crate) fn lookup(&self, ty: &EntityType, scheme: SchemeId) -> Option<PlanId> {
        self.index.get(&(ty.type_id, scheme)).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.plans.len()
    }
}

impl PlanCache {
    pub(crate) fn snapshot(&self) -> Arc<Arena> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the plan for `ty` / `scheme`, resolving it and every plan it
    /// depends on if needed. The returned arena contains the plan.
    pub(crate) fn resolve(
        &self,
        provider: &dyn MappingProvider,
        ty: &'static EntityType,
        scheme: SchemeId,
        max_depth: usize,
    ) -> Result<(Arc<Arena>, PlanId)> {
        let snapshot = self.snapshot();
        if let Some(id) = snapshot.lookup(ty, scheme) {
            log::trace!("plan cache hit for {}#{scheme}", ty.name);
            return Ok((snapshot, id));
        }

        let _guard = self.resolving.lock().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have resolved it while we waited
        let base = self.snapshot();
        if let Some(id) = base.lookup(ty, scheme) {
            return Ok((base, id));
        }

        let mut resolver = Resolver::new(provider, &base, max_depth);
        let id = resolver.resolve_root(ty, scheme)?;
        let arena = Arc::new(resolver.commit());

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = arena.clone();

        Ok((arena, id))
    }

    /// Drops every resolved plan and compiled routine.
    pub(crate) fn clear(&self) {
        let _guard = self.resolving.lock().unwrap_or_else(PoisonError::into_inner);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        log::debug!("clearing {} cached plans", current.len());
        *current = Arc::default();
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot().len()
    }
}
