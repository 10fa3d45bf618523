//! The concrete state shape dispatched through the store: the active query,
//! the column overlay, and the scroll/view-mode flags everything else in
//! `engine` derives its behavior from.

use indexmap::IndexMap;

use crate::model::{ColumnFilter, Query, Row, Sort};
use crate::state::{GridMode, ViewMode};

use super::column_model::ColumnState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridState {
    pub sort: Option<Sort>,
    pub filter_text: String,
    pub column_filters: IndexMap<String, ColumnFilter>,
    pub columns: ColumnState,
    /// Every key declared in the grid's configuration, in declaration
    /// order. Fixed at construction; `COLUMN_ORDER_SET` reconciles its
    /// payload against this list rather than trusting it verbatim.
    pub known_column_keys: Vec<String>,
    pub table_width: Option<u32>,
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub view_mode: ViewMode,
    pub row_groups: Vec<String>,
    pub total_rows: usize,
    pub summary: Option<Row>,
    /// Client/server decision made by the Bootstrap Policy; immutable once
    /// bootstrap dispatches it.
    pub mode: GridMode,
    /// Bumped by every query-affecting action; fetch and summary responses
    /// carry the generation they were issued under so a response that
    /// settles after a newer query was already dispatched gets dropped.
    pub generation: u64,
}

impl GridState {
    pub fn query(&self) -> Query {
        Query {
            sort: self.sort.clone(),
            filter_text: self.filter_text.clone(),
            column_filters: self.column_filters.clone(),
        }
    }
}
