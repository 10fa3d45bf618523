//! Data model: columns, rows, and the query shape a data strategy evaluates.

pub mod column;
pub mod query;
pub mod row;

pub use column::{Column, DataType, ResolvedColumn, SummaryType, WidthSpec};
pub use query::{ColumnFilter, Query, Sort, SortDirection};
pub use row::{cell, cell_as_f64, stringify_cell, Row};
