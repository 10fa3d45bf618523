//! Multi-level row grouping: builds a group tree from flat rows and
//! flattens it back into the linear sequence a virtualized list renders.

mod engine;
pub use engine::{build_pivot_tree, flatten, FlatRow, PivotConfig, RowType, ValueField};

mod tree;
pub use tree::{NodeKind, PivotNode, PivotTree};
