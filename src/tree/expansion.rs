//! Per-node expand and collapse overrides.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::TreeNode;

/// Per-node open/closed state kept across tree rebuilds.
///
/// Nodes without an explicit entry fall back to their
/// `expanded_by_default` hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: HashSet<String>,
    collapsed: HashSet<String>,
}

impl ExpansionState {
    /// Empty state, every node uses its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `node` is currently shown open
    pub fn is_expanded(&self, node: &TreeNode) -> bool {
        if self.expanded.contains(&node.id) {
            true
        } else if self.collapsed.contains(&node.id) {
            false
        } else {
            node.expanded_by_default
        }
    }

    /// Flips the state of `node` and returns the new value
    pub fn toggle(&mut self, node: &TreeNode) -> bool {
        let open = !self.is_expanded(node);
        self.set(&node.id, open);
        open
    }

    /// Opens or closes a node by id
    pub fn set(&mut self, id: &str, open: bool) {
        if open {
            self.collapsed.remove(id);
            self.expanded.insert(id.to_string());
        } else {
            self.expanded.remove(id);
            self.collapsed.insert(id.to_string());
        }
    }

    /// Opens every node that has children
    pub fn expand_all(&mut self, root: &TreeNode) {
        self.set_subtree(root, true);
    }

    /// Closes every node that has children
    pub fn collapse_all(&mut self, root: &TreeNode) {
        self.set_subtree(root, false);
    }

    fn set_subtree(&mut self, node: &TreeNode, open: bool) {
        if !node.is_leaf() {
            self.set(&node.id, open);
        }
        for child in &node.children {
            self.set_subtree(child, open);
        }
    }

    /// Drops entries for ids no longer present in the tree
    pub fn prune(&mut self, root: &TreeNode) {
        let mut live = HashSet::new();
        collect_node_ids(root, &mut live);
        self.expanded.retain(|id| live.contains(id.as_str()));
        self.collapsed.retain(|id| live.contains(id.as_str()));
    }
}

fn collect_node_ids<'a>(node: &'a TreeNode, out: &mut HashSet<&'a str>) {
    out.insert(node.id.as_str());
    for child in &node.children {
        collect_node_ids(child, out);
    }
}
