//! Group tree construction, aggregation and the iterative flattening that
//! turns a [`PivotTree`] into the linear row sequence a virtualized list
//! renders.

use indexmap::IndexMap;

use crate::model::{cell_as_f64, stringify_cell, Row, SummaryType};
use crate::props::ExtractKeyFn;

use super::tree::{NodeKind, PivotNode, PivotTree};

#[derive(Debug, Clone, PartialEq)]
pub struct ValueField {
    pub key: String,
    pub aggregation: SummaryType,
}

/// `rowGroups` must have 1 to 5 entries; enforced by the caller
/// constructing this (the grid's lifecycle/config validation), not here.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotConfig {
    pub row_groups: Vec<String>,
    pub value_fields: Vec<ValueField>,
    pub show_subtotals: bool,
    /// Identifies leaf rows by a stable key instead of their slab id, so a
    /// host keying its rendered list by [`FlatRow::key`] doesn't remount a
    /// row that merely moved as a result of a re-sort or page refetch.
    pub row_key: Option<ExtractKeyFn>,
}

fn aggregate_rows(rows: &[&Row], value_fields: &[ValueField]) -> Row {
    let mut out = Row::new();
    for field in value_fields {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(&field.key).and_then(cell_as_f64))
            .collect();
        let value = match field.aggregation {
            SummaryType::None => continue,
            SummaryType::Sum => values.iter().sum::<f64>(),
            SummaryType::Avg => {
                if values.is_empty() {
                    0.0
                } else {
                    (values.iter().sum::<f64>() / values.len() as f64 * 100.0).round() / 100.0
                }
            }
            SummaryType::Count => rows.len() as f64,
            SummaryType::Max => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                }
            }
            SummaryType::Min => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().cloned().fold(f64::INFINITY, f64::min)
                }
            }
        };
        out.insert(
            field.key.clone(),
            serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        );
    }
    out
}

fn build_level(tree: &mut PivotTree, parent_id: usize, rows: &[&Row], depth: usize, config: &PivotConfig) {
    if depth == config.row_groups.len() {
        for row in rows {
            tree.append_child(parent_id, NodeKind::Leaf, (*row).clone());
        }
        return;
    }

    let group_key = &config.row_groups[depth];
    let mut groups: IndexMap<String, Vec<&Row>> = IndexMap::new();
    for row in rows {
        let value = row.get(group_key).map(stringify_cell).unwrap_or_default();
        groups.entry(value).or_default().push(row);
    }

    for (group_value, group_rows) in groups {
        let aggregated = aggregate_rows(&group_rows, &config.value_fields);
        let node_id = tree.append_child(
            parent_id,
            NodeKind::Group {
                group_key: group_key.clone(),
                group_value,
            },
            aggregated,
        );
        build_level(tree, node_id, &group_rows, depth + 1, config);
    }
}

/// Builds the group tree for `data` under `config`. The root's aggregated
/// row is the grand total over the whole input.
pub fn build_pivot_tree(data: &[Row], config: &PivotConfig) -> PivotTree {
    let mut tree = PivotTree::new();
    let all_refs: Vec<&Row> = data.iter().collect();
    let grand_total = aggregate_rows(&all_refs, &config.value_fields);
    let root_id = tree.set_root(grand_total);
    build_level(&mut tree, root_id, &all_refs, 0, config);
    tree
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    Normal,
    Subtotal,
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    pub node_id: Option<usize>,
    pub row_type: RowType,
    pub level: i64,
    pub data: Row,
    pub is_expanded: bool,
    /// Stable identity for keyed list diffing: a leaf's `row_key` result if
    /// one was configured, the node's slab id otherwise.
    pub key: String,
}

enum StackOp {
    Visit(usize),
    EmitSubtotal(usize),
}

fn push_children_reversed(tree: &PivotTree, node_id: usize, stack: &mut Vec<StackOp>) {
    for &child_id in tree.children(node_id).iter().rev() {
        stack.push(StackOp::Visit(child_id));
    }
}

fn leaf_key(node_id: usize, node: &PivotNode, row_key: Option<&ExtractKeyFn>) -> String {
    match (&node.kind, row_key) {
        (NodeKind::Leaf, Some(extract)) => extract.apply(&node.data),
        _ => node_id.to_string(),
    }
}

/// Flattens the tree into render order using an explicit stack: a group's
/// subtotal sentinel is pushed before its children so it pops after all of
/// them, and the grand total is appended once the whole tree is drained.
pub fn flatten(tree: &PivotTree, show_subtotals: bool, row_key: Option<&ExtractKeyFn>) -> Vec<FlatRow> {
    let mut out = Vec::new();
    let root_id = match tree.root_id() {
        Some(id) => id,
        None => return out,
    };

    let mut stack = Vec::new();
    push_children_reversed(tree, root_id, &mut stack);

    while let Some(op) = stack.pop() {
        match op {
            StackOp::Visit(node_id) => {
                let node = tree.get(node_id).expect("flatten: dangling node id");
                out.push(FlatRow {
                    node_id: Some(node_id),
                    row_type: RowType::Normal,
                    level: node.level,
                    data: node.data.clone(),
                    is_expanded: node.expanded,
                    key: leaf_key(node_id, node, row_key),
                });
                if node.expanded {
                    if matches!(node.kind, NodeKind::Group { .. }) && show_subtotals {
                        stack.push(StackOp::EmitSubtotal(node_id));
                    }
                    push_children_reversed(tree, node_id, &mut stack);
                }
            }
            StackOp::EmitSubtotal(node_id) => {
                let node = tree.get(node_id).expect("flatten: dangling node id");
                out.push(FlatRow {
                    node_id: Some(node_id),
                    row_type: RowType::Subtotal,
                    level: node.level + 1,
                    data: node.data.clone(),
                    is_expanded: false,
                    key: format!("{node_id}-subtotal"),
                });
            }
        }
    }

    let root = tree.get(root_id).expect("flatten: missing root");
    out.push(FlatRow {
        node_id: Some(root_id),
        row_type: RowType::GrandTotal,
        level: 0,
        data: root.data.clone(),
        is_expanded: false,
        key: "grand-total".to_string(),
    });

    out
}
