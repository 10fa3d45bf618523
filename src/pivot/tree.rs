//! Slab-backed group tree: the materialized result of grouping filtered
//! rows by one or more keys.

use slab::Slab;

use crate::model::Row;

/// What a node represents: an intermediate group (keyed by one `rowGroups`
/// level) or a leaf carrying one source row unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group { group_key: String, group_value: String },
    Leaf,
}

pub struct PivotNode {
    pub kind: NodeKind,
    /// Root is level `-1` and is never rendered or toggled.
    pub level: i64,
    /// Aggregated row for a group node, the row itself for a leaf.
    pub data: Row,
    pub expanded: bool,
    pub parent_id: Option<usize>,
    pub children: Option<Vec<usize>>,
}

/// A tree of [`PivotNode`]s addressed by slab index rather than pointer, so
/// toggling expansion or walking ancestry never needs `Rc<RefCell<_>>`.
pub struct PivotTree {
    root_id: Option<usize>,
    slab: Slab<PivotNode>,
}

impl Default for PivotTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PivotTree {
    pub fn new() -> Self {
        Self {
            root_id: None,
            slab: Slab::new(),
        }
    }

    pub fn root_id(&self) -> Option<usize> {
        self.root_id
    }

    pub fn get(&self, node_id: usize) -> Option<&PivotNode> {
        self.slab.get(node_id)
    }

    pub fn get_mut(&mut self, node_id: usize) -> Option<&mut PivotNode> {
        self.slab.get_mut(node_id)
    }

    /// Inserts the root node (always expanded, `level == -1`). Discards any
    /// prior tree contents.
    pub fn set_root(&mut self, data: Row) -> usize {
        self.slab.clear();
        let node_id = self.slab.insert(PivotNode {
            kind: NodeKind::Group {
                group_key: String::new(),
                group_value: String::new(),
            },
            level: -1,
            data,
            expanded: true,
            parent_id: None,
            children: None,
        });
        self.root_id = Some(node_id);
        node_id
    }

    /// Appends `kind`/`data` as the last child of `parent_id`, returning the
    /// new node's id.
    pub fn append_child(&mut self, parent_id: usize, kind: NodeKind, data: Row) -> usize {
        let level = self.slab[parent_id].level + 1;
        let child_id = self.slab.insert(PivotNode {
            kind,
            level,
            data,
            expanded: false,
            parent_id: Some(parent_id),
            children: None,
        });
        let parent = &mut self.slab[parent_id];
        parent.children.get_or_insert_with(Vec::new).push(child_id);
        child_id
    }

    pub fn children(&self, node_id: usize) -> &[usize] {
        self.slab
            .get(node_id)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    pub fn set_expanded(&mut self, node_id: usize, expanded: bool) {
        if let Some(node) = self.slab.get_mut(node_id) {
            node.expanded = expanded;
        }
    }

    /// Depth-first search flipping `expanded`; returns whether `node_id` was
    /// found anywhere in the tree.
    pub fn toggle_node(&mut self, node_id: usize) -> bool {
        if !self.slab.contains(node_id) {
            return false;
        }
        let current = self.slab[node_id].expanded;
        self.slab[node_id].expanded = !current;
        true
    }

    /// Ancestor chain of `node_id`, nearest first, excluding the synthetic
    /// root.
    pub fn ancestors(&self, node_id: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = self.slab.get(node_id).and_then(|n| n.parent_id);
        while let Some(id) = current {
            if self.slab[id].level < 0 {
                break;
            }
            chain.push(id);
            current = self.slab[id].parent_id;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_sets_level_and_parent() {
        let mut tree = PivotTree::new();
        let root = tree.set_root(Row::new());
        let child = tree.append_child(root, NodeKind::Leaf, Row::new());
        assert_eq!(tree.get(child).unwrap().level, 0);
        assert_eq!(tree.get(child).unwrap().parent_id, Some(root));
        assert_eq!(tree.children(root), &[child]);
    }

    #[test]
    fn toggle_node_flips_expanded_and_reports_found() {
        let mut tree = PivotTree::new();
        let root = tree.set_root(Row::new());
        let child = tree.append_child(root, NodeKind::Leaf, Row::new());
        assert!(!tree.get(child).unwrap().expanded);
        assert!(tree.toggle_node(child));
        assert!(tree.get(child).unwrap().expanded);
        assert!(!tree.toggle_node(9999));
    }

    #[test]
    fn ancestors_excludes_synthetic_root() {
        let mut tree = PivotTree::new();
        let root = tree.set_root(Row::new());
        let a = tree.append_child(root, NodeKind::Leaf, Row::new());
        let b = tree.append_child(a, NodeKind::Leaf, Row::new());
        assert_eq!(tree.ancestors(b), vec![a]);
    }
}
