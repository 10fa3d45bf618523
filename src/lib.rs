//! Headless core engine for a virtualized, sortable, filterable, pivotable
//! data grid.
//!
//! This crate owns no rendering surface. It computes what a grid's host
//! should draw (the visible row window, resolved column widths, a flattened
//! pivot tree) and never touches a DOM, canvas or terminal itself; a host
//! implements [`element_factory::ElementFactory`] once to bridge the two.
//!
//! # Layout
//!
//! - [`model`]: columns, rows and the query shape a data source evaluates.
//! - [`props`]: cheaply cloneable, pointer-equality-comparable callback
//!   wrappers (`Rc<dyn Fn>`) used in column declarations.
//! - [`state`]: the reducer-driven [`state::Store`] and column-layout
//!   persistence.
//! - [`engine`]: virtual scrolling, column resolution, data strategies and
//!   the lifecycle that wires them all to a store.
//! - [`pivot`]: multi-level row grouping and flattening.
//!
//! # Example
//!
//! ```no_run
//! use gridcore::element_factory::ElementFactory;
//! use gridcore::engine::{DataSource, GridConfig, Lifecycle};
//! use gridcore::model::{Column, Row};
//!
//! struct NullFactory;
//! impl ElementFactory for NullFactory {
//!     type Element = ();
//!     fn create_row(&mut self, _row_index: usize, _data: &Row) {}
//!     fn create_skeleton_row(&mut self, _row_index: usize) {}
//!     fn remove_element(&mut self, _element: ()) {}
//!     fn set_translate_y(&mut self, _element: &(), _y: i64) {}
//!     fn set_column_width_var(&mut self, _key: &str, _width: i64) {}
//!     fn set_column_offset_var(&mut self, _key: &str, _offset: i64) {}
//!     fn set_content_height(&mut self, _height: i64) {}
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let columns = vec![Column::new("name", "Name")];
//! let config = GridConfig::new(
//!     columns.clone(),
//!     DataSource::InMemory { data: Vec::new(), columns },
//!     NullFactory,
//! );
//! let (lifecycle, bootstrap) = Lifecycle::new(config)?;
//! bootstrap.await?;
//! assert!(lifecycle.is_ready());
//! # Ok(())
//! # }
//! ```

pub mod element_factory;
pub mod engine;
pub mod error;
pub mod model;
pub mod pivot;
pub mod props;
pub mod state;

/// Re-exports of the types most host integrations touch.
pub mod prelude {
    pub use crate::element_factory::ElementFactory;
    pub use crate::engine::{DataSource, GridConfig, Lifecycle};
    pub use crate::error::{GridError, GridResult};
    pub use crate::model::{Column, ColumnFilter, DataType, Query, Row, Sort, SortDirection, SummaryType, WidthSpec};
    pub use crate::props::{ExtractKeyFn, FilterFn, RenderFn, SorterFn};
    pub use crate::state::{Action, EffectClass, GridMode, KeyValueStore, PersistenceAdapter, Store, ViewMode};
}
