//! Tabular inputs the engine extracts from.
//!
//! A [`RowSet`] is a fully materialized, randomly addressable table that can
//! navigate relations to child rows. A [`Cursor`] is forward-only and only
//! exposes the current row.

use crate::value::Type;
use crate::{Result, Value};

/// A source column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,

    /// Declared storage type. `None` when the source does not know it.
    pub ty: Option<Type>,
}

/// A single row's worth of columns and values.
pub trait Record {
    fn columns(&self) -> &[Column];

    fn value(&self, column: usize) -> &Value;

    fn is_null(&self, column: usize) -> bool {
        self.value(column).is_null()
    }

    /// Looks a value up by column name.
    fn get(&self, name: &str) -> Option<&Value> {
        find_column(self.columns(), name).map(|column| self.value(column))
    }
}

/// A materialized table.
pub trait RowSet {
    /// Name of the table, used to pick related tables by name.
    fn name(&self) -> &str;

    fn columns(&self) -> &[Column];

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, row: usize, column: usize) -> &Value;

    fn is_null(&self, row: usize, column: usize) -> bool {
        self.value(row, column).is_null()
    }

    /// The child rows reachable from `row` through `relation`.
    ///
    /// Returns `None` if this row set does not know the relation, in which
    /// case the engine falls back to joining on key columns.
    fn child_rows(&self, row: usize, relation: &str) -> Option<RelatedRows<'_>> {
        let _ = (row, relation);
        None
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        find_column(self.columns(), name)
    }
}

/// Rows of one row set reached from a parent row.
pub struct RelatedRows<'a> {
    pub set: &'a dyn RowSet,

    pub rows: Vec<usize>,
}

/// A forward-only row source.
pub trait Cursor: Record {
    /// Moves to the next row. Returns `false` once the source is exhausted.
    fn advance(&mut self) -> Result<bool>;
}

/// One row of a [`RowSet`], viewed as a [`Record`].
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    pub set: &'a dyn RowSet,
    pub row: usize,
}

impl Record for RowRef<'_> {
    fn columns(&self) -> &[Column] {
        self.set.columns()
    }

    fn value(&self, column: usize) -> &Value {
        self.set.value(self.row, column)
    }

    fn is_null(&self, column: usize) -> bool {
        self.set.is_null(self.row, column)
    }
}

impl Column {
    pub fn new(name: impl Into<String>, ty: impl Into<Option<Type>>) -> Column {
        Column {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Finds a column by name. Exact matches win over case-insensitive ones.
pub fn find_column(columns: &[Column], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|column| column.name == name)
        .or_else(|| {
            columns
                .iter()
                .position(|column| column.name.eq_ignore_ascii_case(name))
        })
}

impl std::fmt::Debug for RelatedRows<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelatedRows")
            .field("set", &self.set.name())
            .field("rows", &self.rows)
            .finish()
    }
}
