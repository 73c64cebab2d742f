use super::Table;

use rowbind_core::RowSet;

use indexmap::IndexMap;

/// A set of named tables.
#[derive(Debug, Default, Clone)]
pub struct DataSet {
    tables: IndexMap<String, Table>,
}

impl DataSet {
    pub fn new() -> DataSet {
        DataSet::default()
    }

    /// Adds a table, replacing any table with the same name.
    pub fn insert(&mut self, table: Table) -> &mut Self {
        self.tables.insert(table.name().to_string(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name).or_else(|| {
            self.tables
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, table)| table)
        })
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Every table as a row set, in insertion order.
    pub fn row_sets(&self) -> Vec<&dyn RowSet> {
        self.tables.values().map(|table| table as &dyn RowSet).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
