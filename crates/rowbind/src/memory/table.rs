use crate::engine::{CompositeKey, LinkIndex};

use rowbind_core::source::find_column;
use rowbind_core::{Column, Cursor, Error, Result, RelatedRows, RowRef, RowSet, Type, Value};

use std::sync::OnceLock;

/// A materialized table.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    relations: Vec<Relation>,
}

/// A navigable relation from the rows of one table to child rows.
#[derive(Debug, Clone)]
struct Relation {
    name: String,
    target: Target,
    parent_columns: Vec<usize>,
    child_columns: Vec<usize>,

    /// Child rows by key, built on first navigation
    index: OnceLock<LinkIndex>,
}

#[derive(Debug, Clone)]
enum Target {
    /// The child rows live in the same table
    Itself,
    Table(Box<Table>),
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            columns: vec![],
            rows: vec![],
            relations: vec![],
        }
    }

    /// Copies every remaining record of a cursor into a new table.
    pub fn load<C: Cursor + ?Sized>(name: impl Into<String>, cursor: &mut C) -> Result<Table> {
        let mut table = Table::new(name);
        table.columns = cursor.columns().to_vec();

        while cursor.advance()? {
            let width = cursor.columns().len();
            if width != table.columns.len() {
                return Err(Error::invalid_argument(format!(
                    "cursor changed shape from {} to {width} columns",
                    table.columns.len()
                )));
            }

            table
                .rows
                .push((0..width).map(|column| cursor.value(column).clone()).collect());
        }

        log::debug!("loaded {} rows into `{}`", table.rows.len(), table.name);
        Ok(table)
    }

    /// Adds a column. Existing rows get a null value for it.
    pub fn column(mut self, name: impl Into<String>, ty: impl Into<Option<Type>>) -> Self {
        self.columns.push(Column::new(name, ty));

        for row in &mut self.rows {
            row.push(Value::Null);
        }

        self
    }

    /// Adds a row.
    ///
    /// # Panics
    ///
    /// Panics if the number of values differs from the number of columns.
    /// Use [`push_row`](Table::push_row) to handle this as an error.
    pub fn row<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        if let Err(err) = self.push_row(values) {
            panic!("{err}");
        }

        self
    }

    pub fn push_row<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        if values.len() != self.columns.len() {
            return Err(Error::invalid_argument(format!(
                "row has {} values but `{}` has {} columns",
                values.len(),
                self.name,
                self.columns.len()
            )));
        }

        self.rows.push(values);

        // Indices over this table's own rows are stale now
        for relation in &mut self.relations {
            if matches!(relation.target, Target::Itself) {
                relation.index.take();
            }
        }

        Ok(())
    }

    /// Relates the rows of this table to the rows of `child`, which becomes
    /// owned by this table.
    pub fn relate(
        &mut self,
        name: impl Into<String>,
        child: Table,
        parent_columns: &[&str],
        child_columns: &[&str],
    ) -> Result<&mut Self> {
        let (parent_columns, child_columns) =
            self.key_columns(&child, parent_columns, child_columns)?;

        self.relations.push(Relation {
            name: name.into(),
            target: Target::Table(Box::new(child)),
            parent_columns,
            child_columns,
            index: OnceLock::new(),
        });

        Ok(self)
    }

    /// Relates the rows of this table to other rows of the same table.
    pub fn relate_self(
        &mut self,
        name: impl Into<String>,
        parent_columns: &[&str],
        child_columns: &[&str],
    ) -> Result<&mut Self> {
        let (parent_columns, child_columns) =
            self.key_columns(self, parent_columns, child_columns)?;

        self.relations.push(Relation {
            name: name.into(),
            target: Target::Itself,
            parent_columns,
            child_columns,
            index: OnceLock::new(),
        });

        Ok(self)
    }

    /// Returns the child table of a relation, if it is a separate table.
    pub fn child(&self, relation: &str) -> Option<&Table> {
        match &self.relation(relation)?.target {
            Target::Itself => None,
            Target::Table(table) => Some(table),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.rows.len()).map(move |row| RowRef { set: self, row })
    }

    fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|relation| relation.name == name)
            .or_else(|| {
                self.relations
                    .iter()
                    .find(|relation| relation.name.eq_ignore_ascii_case(name))
            })
    }

    fn key_columns(
        &self,
        child: &Table,
        parent_columns: &[&str],
        child_columns: &[&str],
    ) -> Result<(Vec<usize>, Vec<usize>)> {
        if parent_columns.is_empty() || parent_columns.len() != child_columns.len() {
            return Err(Error::invalid_argument(format!(
                "relation from `{}` to `{}` needs matching, non-empty key columns",
                self.name, child.name
            )));
        }

        let lookup = |table: &Table, names: &[&str]| {
            names
                .iter()
                .map(|name| {
                    find_column(&table.columns, name).ok_or_else(|| {
                        Error::invalid_argument(format!(
                            "`{}` has no column `{name}`",
                            table.name
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
        };

        Ok((lookup(self, parent_columns)?, lookup(child, child_columns)?))
    }
}

impl RowSet for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: usize) -> &Value {
        &self.rows[row][column]
    }

    fn child_rows(&self, row: usize, relation: &str) -> Option<RelatedRows<'_>> {
        let relation = self.relation(relation)?;

        let set: &dyn RowSet = match &relation.target {
            Target::Itself => self,
            Target::Table(table) => &**table,
        };

        let Some(key) = CompositeKey::read(&RowRef { set: self, row }, &relation.parent_columns)
        else {
            return Some(RelatedRows { set, rows: vec![] });
        };

        let index = relation
            .index
            .get_or_init(|| LinkIndex::over(set, &relation.child_columns));

        Some(RelatedRows {
            set,
            rows: index.rows(&key).to_vec(),
        })
    }
}
