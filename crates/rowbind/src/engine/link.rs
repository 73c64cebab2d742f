use super::{CompositeKey, KeyId, KeyInfo, Plan};

use rowbind_core::{Result, RowRef, RowSet};

use by_address::ByThinAddress;
use std::collections::HashMap;

/// Child rows of one row set grouped by their key.
#[derive(Debug, Default, Clone)]
pub(crate) struct LinkIndex {
    rows: HashMap<CompositeKey, Vec<usize>>,
}

/// Link indices built during one extraction, one per child row set and
/// relation key.
#[derive(Default)]
pub(crate) struct Linker<'src> {
    indices: HashMap<(ByThinAddress<&'src dyn RowSet>, KeyId), LinkIndex>,
}

impl LinkIndex {
    /// Indexes every row of `set` by the child-side columns of `key`. Rows
    /// with a null key column are left out.
    pub(crate) fn build(key: &KeyInfo, set: &dyn RowSet) -> Result<LinkIndex> {
        let columns = key.child_indices(set.columns())?;
        Ok(LinkIndex::over(set, &columns))
    }

    /// Indexes every row of `set` by the given columns.
    pub(crate) fn over(set: &dyn RowSet, columns: &[usize]) -> LinkIndex {
        let mut rows: HashMap<CompositeKey, Vec<usize>> = HashMap::new();

        for row in 0..set.len() {
            if let Some(value) = CompositeKey::read(&RowRef { set, row }, columns) {
                rows.entry(value).or_default().push(row);
            }
        }

        LinkIndex { rows }
    }

    /// Rows matching `key`, in the order they appear in the row set.
    pub(crate) fn rows(&self, key: &CompositeKey) -> &[usize] {
        self.rows.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<'src> Linker<'src> {
    /// Returns the index of `set` for `key`, building it on first use.
    ///
    /// The first request for a row set indexes it for every foreign key of
    /// the plan it feeds, since sibling relations usually ask next.
    pub(crate) fn index(
        &mut self,
        plan: &Plan,
        key: &KeyInfo,
        set: &'src dyn RowSet,
    ) -> Result<&LinkIndex> {
        let id = (ByThinAddress(set), key.id.clone());

        if !self.indices.contains_key(&id) {
            for foreign in plan.foreign_keys() {
                if foreign.id == key.id {
                    continue;
                }

                // Keys whose columns this row set lacks are reported if and
                // when they are actually used
                if let Ok(index) = LinkIndex::build(foreign, set) {
                    self.indices
                        .entry((ByThinAddress(set), foreign.id.clone()))
                        .or_insert(index);
                }
            }

            log::trace!("indexing `{}` for relation `{}`", set.name(), key.name);
            let index = LinkIndex::build(key, set)?;
            self.indices.insert(id.clone(), index);
        }

        Ok(&self.indices[&id])
    }
}
