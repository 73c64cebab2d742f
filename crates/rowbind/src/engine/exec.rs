use super::link::Linker;
use super::routine::Coercion;
use super::{Arena, ColumnMap, KeyInfo, Plan, PlanId, Routine, SourceKind, Step};
use crate::ObjectBuilder;

use rowbind_core::schema::Member;
use rowbind_core::{
    err, Collection, Column, Error, Object, Record, Result, RowRef, RowSet, SchemeId, Value,
};

use by_address::ByThinAddress;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type IdentityKey<'src> = (TypeId, SchemeId, ByThinAddress<&'src dyn RowSet>, usize);

/// Objects already materialized from a given row.
///
/// Re-reaching a row under the same type and scheme yields a copy of the
/// cached object instead of extracting the row again.
#[derive(Default)]
pub(crate) struct IdentityCache<'src> {
    objects: HashMap<IdentityKey<'src>, Box<dyn Object>>,

    /// Rows whose extraction has started but not finished
    building: HashSet<IdentityKey<'src>>,
}

/// One extraction run: a snapshot of the plan arena plus the per-run caches.
pub(crate) struct Exec<'x, 'src> {
    arena: &'x Arena,
    builder: &'x dyn ObjectBuilder,
    max_depth: usize,
    identity: &'x mut IdentityCache<'src>,

    /// Tables joined on key columns when a row set cannot navigate a
    /// relation itself
    related: &'x [&'src dyn RowSet],

    /// Keep top-level objects in the identity cache even when no relation
    /// can reach their rows again in this run
    retain_roots: bool,

    /// Row set column maps, keyed by plan and column slice. Row sets are
    /// borrowed for `'src`, so their column slices do not move.
    maps: HashMap<(PlanId, usize, usize), Arc<ColumnMap>>,

    /// Cursor column maps, valid for `cursor_shape` only
    cursor_maps: HashMap<PlanId, Arc<ColumnMap>>,
    cursor_shape: Vec<Column>,

    links: Linker<'src>,
}

impl<'src> IdentityCache<'src> {
    fn get(&self, key: &IdentityKey<'src>) -> Option<&dyn Object> {
        self.objects.get(key).map(|object| &**object)
    }

    fn insert(&mut self, key: IdentityKey<'src>, object: Box<dyn Object>) {
        self.objects.insert(key, object);
    }

    /// Marks a row as being extracted. Returns `false` if it already is.
    fn enter(&mut self, key: IdentityKey<'src>) -> bool {
        self.building.insert(key)
    }

    fn leave(&mut self, key: &IdentityKey<'src>) {
        self.building.remove(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing {} cached identities", self.objects.len());
        self.objects.clear();
        self.building.clear();
    }
}

impl<'x, 'src> Exec<'x, 'src> {
    pub(crate) fn new(
        arena: &'x Arena,
        builder: &'x dyn ObjectBuilder,
        max_depth: usize,
        identity: &'x mut IdentityCache<'src>,
        related: &'x [&'src dyn RowSet],
    ) -> Self {
        Exec {
            arena,
            builder,
            max_depth,
            identity,
            related,
            retain_roots: false,
            maps: HashMap::new(),
            cursor_maps: HashMap::new(),
            cursor_shape: vec![],
            links: Linker::default(),
        }
    }

    /// Caches every top-level object, so later runs sharing the identity
    /// cache can reuse them.
    pub(crate) fn retaining_roots(mut self) -> Self {
        self.retain_roots = true;
        self
    }

    /// Extracts every row of `set` into `dest`, in row order.
    pub(crate) fn fill_rows(
        &mut self,
        plan: PlanId,
        set: &'src dyn RowSet,
        dest: &mut dyn Collection,
    ) -> Result<()> {
        self.check_mapped(plan, SourceKind::RowSet, set.columns())?;

        // Top-level objects are only worth caching if a relation can reach
        // their rows again
        let arena = self.arena;
        let retain = self.retain_roots || !arena.plan(plan).relations_from_parent.is_empty();

        dest.reserve(set.len());

        for row in 0..set.len() {
            if let Some(object) = self.materialize_row(plan, set, row, 0, retain)? {
                dest.push_object(object)?;
            }
        }

        Ok(())
    }

    /// Extracts one row of `set` into an existing object.
    pub(crate) fn fill_row(
        &mut self,
        plan: PlanId,
        set: &'src dyn RowSet,
        row: usize,
        object: &mut dyn Object,
    ) -> Result<()> {
        self.check_row(plan, set, row)?;

        let arena = self.arena;
        let key = identity_key(arena.plan(plan), set, row);
        let entered = self.identity.enter(key);

        let result = self.populate_row(plan, set, row, object, 0);

        if entered {
            self.identity.leave(&key);
        }

        result
    }

    /// Fails if `row` is out of range or the plan reads nothing from `set`.
    pub(crate) fn check_row(
        &mut self,
        plan: PlanId,
        set: &'src dyn RowSet,
        row: usize,
    ) -> Result<()> {
        if row >= set.len() {
            return Err(Error::invalid_argument(format!(
                "row {row} is out of range for `{}` with {} rows",
                set.name(),
                set.len()
            )));
        }

        self.check_mapped(plan, SourceKind::RowSet, set.columns())
    }

    /// Fails if the plan reads nothing from a record of this shape.
    pub(crate) fn check_record<R: Record + ?Sized>(
        &mut self,
        plan: PlanId,
        record: &R,
    ) -> Result<()> {
        self.check_mapped(plan, SourceKind::Cursor, record.columns())
    }

    /// Extracts a cursor's current record into an existing object.
    pub(crate) fn fill_record<R: Record + ?Sized>(
        &mut self,
        plan: PlanId,
        record: &R,
        object: &mut dyn Object,
    ) -> Result<()> {
        self.check_record(plan, record)?;
        self.populate_record(plan, record, object, 0)
    }

    /// Fails with a missing mapping error if the plan would read nothing at
    /// all from a source of this shape.
    fn check_mapped(&mut self, id: PlanId, kind: SourceKind, columns: &[Column]) -> Result<()> {
        let arena = self.arena;
        let plan = arena.plan(id);
        let routine = plan.routine(kind);
        let map = match kind {
            SourceKind::RowSet => self.column_map(id, routine, columns),
            SourceKind::Cursor => self.record_map(id, routine, columns),
        };

        if map.has_columns() || routine.has_nested() {
            Ok(())
        } else {
            Err(Error::missing_mapping(plan.ty.name, plan.scheme))
        }
    }

    /// Extracts a row into a new object, or copies the object already
    /// extracted from it.
    ///
    /// Returns `None` when the row is still being extracted further up, as
    /// happens when a row reaches itself through a self relation.
    fn materialize_row(
        &mut self,
        id: PlanId,
        set: &'src dyn RowSet,
        row: usize,
        depth: usize,
        retain: bool,
    ) -> Result<Option<Box<dyn Object>>> {
        let arena = self.arena;
        let plan = arena.plan(id);
        let key = identity_key(plan, set, row);

        if let Some(existing) = self.identity.get(&key) {
            log::trace!("identity hit for {plan} at `{}` row {row}", set.name());
            return Ok(Some(existing.clone_object()));
        }

        if !self.identity.enter(key) {
            log::trace!("`{}` row {row} reaches itself under {plan}", set.name());
            return Ok(None);
        }

        let result = self.build_row(id, set, row, depth);
        self.identity.leave(&key);
        let object = result?;

        if retain {
            self.identity.insert(key, object.clone_object());
        }

        Ok(Some(object))
    }

    fn build_row(
        &mut self,
        id: PlanId,
        set: &'src dyn RowSet,
        row: usize,
        depth: usize,
    ) -> Result<Box<dyn Object>> {
        let ty = self.arena.plan(id).ty;
        let mut object = self.builder.create_instance(ty)?;
        self.populate_row(id, set, row, &mut *object, depth)?;
        Ok(object)
    }

    fn populate_row(
        &mut self,
        id: PlanId,
        set: &'src dyn RowSet,
        row: usize,
        object: &mut dyn Object,
        depth: usize,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::recursion_limit(self.max_depth));
        }

        let arena = self.arena;
        let plan = arena.plan(id);
        let routine = plan.routine(SourceKind::RowSet);
        let map = self.column_map(id, routine, set.columns());

        apply_scalars(plan, routine, &map, &RowRef { set, row }, object)?;

        for step in &routine.steps[routine.scalars..] {
            match step {
                Step::Complex { member, plan, item } => {
                    let nested = object.complex_member_mut(member, *item)?;
                    self.populate_row(*plan, set, row, nested, depth + 1)?;
                }
                Step::Children {
                    member,
                    relation,
                    plan,
                    key,
                } => {
                    let rows = self.child_rows(relation, *plan, key.as_deref(), set, row)?;
                    self.fill_children(member, *plan, rows, object, depth)?;
                }
                Step::Scalar { .. } => {}
            }
        }

        Ok(())
    }

    fn populate_record<R: Record + ?Sized>(
        &mut self,
        id: PlanId,
        record: &R,
        object: &mut dyn Object,
        depth: usize,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::recursion_limit(self.max_depth));
        }

        let arena = self.arena;
        let plan = arena.plan(id);
        let routine = plan.routine(SourceKind::Cursor);
        let map = self.record_map(id, routine, record.columns());

        apply_scalars(plan, routine, &map, record, object)?;

        for step in &routine.steps[routine.scalars..] {
            if let Step::Complex { member, plan, item } = step {
                let nested = object.complex_member_mut(member, *item)?;
                self.populate_record(*plan, record, nested, depth + 1)?;
            }
        }

        Ok(())
    }

    /// Finds the child rows of `row` for a relation: through the row set's
    /// own navigation if it has any, else by joining a related table on the
    /// relation's key columns.
    ///
    /// Returns `None` when neither is available.
    fn child_rows(
        &mut self,
        relation: &str,
        child: PlanId,
        key: Option<&KeyInfo>,
        set: &'src dyn RowSet,
        row: usize,
    ) -> Result<Option<Vec<(&'src dyn RowSet, usize)>>> {
        if let Some(related) = set.child_rows(row, relation) {
            let child_set = related.set;
            return Ok(Some(related.rows.into_iter().map(|r| (child_set, r)).collect()));
        }

        let arena = self.arena;
        let plan = arena.plan(child);

        let Some(child_set) = self.related_table(plan) else {
            return Ok(None);
        };

        let Some(key) = key else {
            return Err(Error::missing_key_info(relation, "no key columns declared"));
        };

        let parent_columns = key.parent_indices(set.columns())?;
        let Some(parent_key) = key.extract(&RowRef { set, row }, &parent_columns) else {
            // A null parent key never links
            return Ok(Some(vec![]));
        };

        let index = self.links.index(plan, key, child_set)?;
        Ok(Some(
            index
                .rows(&parent_key)
                .iter()
                .map(|&r| (child_set, r))
                .collect(),
        ))
    }

    fn fill_children(
        &mut self,
        member: &Member,
        child: PlanId,
        rows: Option<Vec<(&'src dyn RowSet, usize)>>,
        object: &mut dyn Object,
        depth: usize,
    ) -> Result<()> {
        // Leave the collection untouched when there is nothing to add
        let Some(rows) = rows.filter(|rows| !rows.is_empty()) else {
            return Ok(());
        };

        let collection = object.collection_member_mut(member)?;
        collection.reserve(rows.len());

        for (set, row) in rows {
            if let Some(item) = self.materialize_row(child, set, row, depth + 1, true)? {
                collection.push_object(item)?;
            }
        }

        Ok(())
    }

    /// The related table feeding `plan`, matched by the plan's table name or
    /// else its type name.
    fn related_table(&self, plan: &Plan) -> Option<&'src dyn RowSet> {
        let name = plan.table.as_ref().map_or(plan.ty.name, |table| table.name.as_str());

        self.related
            .iter()
            .find(|set| set.name() == name)
            .or_else(|| self.related.iter().find(|set| set.name().eq_ignore_ascii_case(name)))
            .copied()
    }

    fn column_map(&mut self, plan: PlanId, routine: &Routine, columns: &[Column]) -> Arc<ColumnMap> {
        let key = (plan, columns.as_ptr() as usize, columns.len());

        self.maps
            .entry(key)
            .or_insert_with(|| Arc::new(ColumnMap::build(routine, columns)))
            .clone()
    }

    /// Column map for a cursor record. A cursor may switch to a different
    /// result shape between records, which drops every cursor map.
    fn record_map(
        &mut self,
        plan: PlanId,
        routine: &Routine,
        columns: &[Column],
    ) -> Arc<ColumnMap> {
        if self.cursor_shape.as_slice() != columns {
            if !self.cursor_maps.is_empty() {
                log::trace!(
                    "cursor shape changed; dropping {} column maps",
                    self.cursor_maps.len()
                );
            }

            self.cursor_maps.clear();
            self.cursor_shape = columns.to_vec();
        }

        self.cursor_maps
            .entry(plan)
            .or_insert_with(|| Arc::new(ColumnMap::build(routine, columns)))
            .clone()
    }
}

fn identity_key<'src>(plan: &Plan, set: &'src dyn RowSet, row: usize) -> IdentityKey<'src> {
    (plan.ty.type_id, plan.scheme, ByThinAddress(set), row)
}

fn apply_scalars<R: Record + ?Sized>(
    plan: &Plan,
    routine: &Routine,
    map: &ColumnMap,
    record: &R,
    object: &mut dyn Object,
) -> Result<()> {
    for (step, scalar) in routine.steps[..routine.scalars].iter().enumerate() {
        let Step::Scalar { member, column, .. } = scalar else {
            continue;
        };

        let Some(slot) = map.slot(step) else {
            continue;
        };

        let raw = record.value(slot.column);

        let value = match slot.coercion {
            _ if raw.is_null() => Value::Null,
            Coercion::Direct => raw.clone(),
            Coercion::Convert(ty) => ty.convert(raw.clone()).map_err(|cause| {
                cause.context(err!(
                    "failed to read column `{column}` into `{}::{}` for {plan}",
                    plan.ty.name,
                    member.name
                ))
            })?,
        };

        object.set_member(member, value).map_err(|cause| {
            cause.context(err!(
                "failed to load column `{column}` into `{}::{}` for {plan}",
                plan.ty.name,
                member.name
            ))
        })?;
    }

    Ok(())
}
