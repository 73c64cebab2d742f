//! In-memory row sources.
//!
//! [`Table`] is a materialized [`RowSet`](crate::RowSet) that can own child
//! tables and navigate to their rows by key. [`TableCursor`] reads a table
//! forward-only, the way a streaming source would. [`DataSet`] groups loose
//! tables so they can be handed to a session as related tables.

mod cursor;
pub use cursor::TableCursor;

mod dataset;
pub use dataset::DataSet;

mod table;
pub use table::Table;
