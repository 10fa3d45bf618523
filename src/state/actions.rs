//! The closed set of intents a host can dispatch into a [`crate::state::Store`].

use crate::model::{ColumnFilter, Row, Sort};

/// Which view mode the grid is currently rendering rows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Flat,
    Pivot,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Flat
    }
}

/// Whether rows are served from an in-memory dataset or fetched page by
/// page from a remote source. Decided once at bootstrap by the Bootstrap
/// Policy and immutable afterwards; `SetMode` exists for the store to carry
/// that decision, not for a host to flip it mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    Client,
    Server,
}

impl Default for GridMode {
    fn default() -> Self {
        GridMode::Client
    }
}

/// An intent dispatched into the store. Each variant maps to exactly one
/// handler in [`crate::engine::action_router`], which in turn decides the
/// [`EffectClass`] that follows.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSort(Option<Sort>),
    SetFilterText(String),
    SetColumnFilter { key: String, filter: Option<ColumnFilter> },
    ClearColumnFilters,

    SetColumnWidth { key: String, width: u32 },
    SetColumnOrder(Vec<String>),
    SetColumnHidden { key: String, hidden: bool },
    /// Shows or hides several columns in one dispatch (`COLUMN_BATCH_SHOW`
    /// / `COLUMN_BATCH_HIDE`), so a "hide all but these" UI action doesn't
    /// relayout once per key.
    BatchSetColumnHidden { keys: Vec<String>, hidden: bool },
    /// Empties `hiddenKeys` (`COLUMNS_RESET_VISIBILITY`).
    ResetColumnVisibility,
    SetColumnFrozen { key: String, frozen: bool },
    SetTableWidth(u32),

    SetScrollTop(f64),
    SetViewportHeight(f64),

    SetViewMode(ViewMode),
    SetRowGroups(Vec<String>),
    ToggleGroupNode { node_id: usize },

    /// Carries the Bootstrap Policy's client/server decision into the
    /// store. Dispatched exactly once, from the bootstrap future.
    SetMode(GridMode),

    /// The query coordinator's `applyQuery`/bootstrap settled with a new
    /// row count for `generation`; dropped if a newer query has since been
    /// dispatched.
    SetTotalRows { total_rows: usize, generation: u64 },
    PageLoaded { page: usize, generation: u64 },
    SummaryLoaded { summary: Option<Row>, generation: u64 },
    FetchFailed { generation: u64 },
}

/// The class of side effect the [`crate::engine::action_router`] must run
/// after a reducer call, decided purely from which [`Action`] was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectClass {
    /// Pure state change; listeners redraw, nothing else happens.
    None,
    /// Sort/filter/row-group changed: re-run the query, reset scroll to top.
    Requery,
    /// Column layout changed: recompute resolved widths, persist them.
    RelayoutColumns,
    /// Scroll position changed: recompute the visible row window only.
    Rescroll,
}
