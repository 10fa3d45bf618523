//! The headless engine: turns dispatched actions into resolved columns, a
//! visible row window and (optionally) a pivoted row sequence, independent
//! of how a host actually renders an element.

pub mod action_router;
pub mod bootstrap;
pub mod column_manager;
pub mod column_model;
pub mod column_width_solver;
pub mod data_strategy;
pub mod grid_state;
pub mod lifecycle;
pub mod query_coordinator;
pub mod scroller;
pub mod viewport;

pub use bootstrap::{BootstrapPolicy, DataSource};
pub use data_strategy::{DataStrategy, InMemoryStrategy, PagedRemoteStrategy, PageResponse, QueryOutcome};
pub use grid_state::GridState;
pub use lifecycle::{GridConfig, Lifecycle};
pub use scroller::{Scroller, Window};
pub use viewport::Viewport;
