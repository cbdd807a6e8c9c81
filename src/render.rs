//! Plain-text outline of the object tree.

use crate::tree::{ExpansionState, NodeKind, TreeNode};

/// Short tag printed in front of each node label
pub fn kind_marker(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Package => "[PKG]",
        k if k.is_folder() => "[DIR]",
        NodeKind::FunctionGroup => "[FUGR]",
        NodeKind::Program => "[PROG]",
        NodeKind::Class => "[CLAS]",
        NodeKind::Interface => "[INTF]",
        NodeKind::FunctionModuleInclude => "[FM]",
        NodeKind::File => "[FILE]",
        _ => "[INCL]",
    }
}

/// Renders the tree as an indented outline, two spaces per level.
///
/// Children of collapsed nodes are not printed; a collapsed node with
/// children gets a trailing `...`.
pub fn render_tree(root: &TreeNode, expansion: &ExpansionState) -> String {
    let mut out = String::new();
    render_node(root, expansion, 0, &mut out);
    out
}

fn render_node(node: &TreeNode, expansion: &ExpansionState, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let open = expansion.is_expanded(node);
    let suffix = if !open && !node.is_leaf() { " ..." } else { "" };
    out.push_str(&format!("{}{} {}{}\n", indent, kind_marker(node.kind), node.label, suffix));

    if open {
        for child in &node.children {
            render_node(child, expansion, depth + 1, out);
        }
    }
}
