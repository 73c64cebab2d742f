use super::Table;

use rowbind_core::{Column, Cursor, Record, Result, RowSet, Value};

/// Reads a [`Table`] forward-only.
///
/// Until the first call to [`advance`](Cursor::advance), and after the last
/// row, every value reads as null.
#[derive(Debug)]
pub struct TableCursor<'a> {
    table: &'a Table,
    next: usize,
    current: Option<usize>,
}

static NULL: Value = Value::Null;

impl<'a> TableCursor<'a> {
    pub fn new(table: &'a Table) -> TableCursor<'a> {
        TableCursor {
            table,
            next: 0,
            current: None,
        }
    }

    /// Index of the current row in the underlying table.
    pub fn position(&self) -> Option<usize> {
        self.current
    }
}

impl Record for TableCursor<'_> {
    fn columns(&self) -> &[Column] {
        self.table.columns()
    }

    fn value(&self, column: usize) -> &Value {
        match self.current {
            Some(row) => self.table.value(row, column),
            None => &NULL,
        }
    }
}

impl Cursor for TableCursor<'_> {
    fn advance(&mut self) -> Result<bool> {
        if self.next < self.table.len() {
            self.current = Some(self.next);
            self.next += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }
}
