//! Input model: rows, batches and column definitions from the sync server.

mod column;
mod row;

pub use column::{retained_columns, ColumnDefinition};
pub use row::{Batch, DataEntry, FilterScope, Row};
