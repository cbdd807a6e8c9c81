//! Lookups and scope labels over a built tree.

use std::collections::HashSet;

use super::{NodeKind, TreeNode};
use crate::model::ItemId;

/// Collects the distinct item ids reachable from `node`, depth-first in
/// first-seen order. The node itself counts.
pub fn reachable_item_ids(node: &TreeNode) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    collect_ids(node, &mut seen, &mut ids);
    ids
}

fn collect_ids<'a>(node: &'a TreeNode, seen: &mut HashSet<&'a ItemId>, ids: &mut Vec<ItemId>) {
    if let Some(id) = &node.item_id {
        if seen.insert(id) {
            ids.push(id.clone());
        }
    }
    for child in &node.children {
        collect_ids(child, seen, ids);
    }
}

/// Human readable description of what a request scoped to `node` covers
pub fn scope_label(node: &TreeNode) -> String {
    match node.kind {
        NodeKind::Package => format!("Package: {}", node.label),
        NodeKind::FunctionGroup => format!("Function Group: {}", node.label),
        NodeKind::Program if !node.children.is_empty() => format!("Program: {}", node.label),
        NodeKind::Class => format!("Class: {}", node.label),
        NodeKind::Interface => format!("Interface: {}", node.label),
        NodeKind::FunctionGroupsFolder => "All Function Groups".to_string(),
        NodeKind::ProgramsFolder => "All Programs".to_string(),
        NodeKind::ClassesFolder => "All Classes".to_string(),
        _ => node.label.clone(),
    }
}

/// Finds a node by id anywhere below (and including) `root`
pub fn find_node<'a>(root: &'a TreeNode, id: &str) -> Option<&'a TreeNode> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_node(child, id))
}

/// Number of nodes in the subtree, `root` included
pub fn count_nodes(root: &TreeNode) -> usize {
    1 + root.children.iter().map(count_nodes).sum::<usize>()
}
