//! Object-navigator tree: package, category folders, objects, includes and
//! parsed sub-items.
//!
//! The tree is rebuilt from scratch whenever the item collection changes.
//! Node ids are derived from role tags and item ids only, so a rebuild over
//! the same items yields the same ids and [`ExpansionState`] survives it.

pub mod builder;
pub mod expansion;
pub mod query;

use serde::{Deserialize, Serialize};

use crate::model::ItemId;

pub use builder::build_tree;
pub use expansion::ExpansionState;
pub use query::{count_nodes, find_node, reachable_item_ids, scope_label};

/// Role of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Root node
    Package,
    /// Folder holding all function groups
    FunctionGroupsFolder,
    /// Folder holding all programs
    ProgramsFolder,
    /// Folder holding classes and interfaces
    ClassesFolder,
    /// Folder holding everything unclassified
    UncategorizedFolder,
    /// One function group
    FunctionGroup,
    /// `SAPL<group>`
    FgMainProgram,
    /// `L<group>TOP`
    FgTopInclude,
    /// `L<group>UXX`
    FgUxxInclude,
    /// `L<group>FXX`
    FgFxxInclude,
    /// "Function Modules" folder of a function group
    FgFunctionModulesFolder,
    /// "Includes" folder of a function group
    FgIncludesFolder,
    /// Function module (parsed) or its include file
    FunctionModuleInclude,
    /// Form include of a function group, or a FORM/MODULE parsed from it
    FormInclude,
    /// Program, either a single file or a group with includes
    Program,
    /// Program TOP include
    TopInclude,
    /// Program PBO include
    PboInclude,
    /// Program PAI include
    PaiInclude,
    /// Screen MODULE parsed from a program
    ScreenInclude,
    /// Program include or FORM parsed from one
    Include,
    /// Class pool
    Class,
    /// Interface pool
    Interface,
    /// Unclassified file
    File,
}

impl NodeKind {
    /// Whether the node is a pure container with no backing file
    pub fn is_folder(self) -> bool {
        matches!(
            self,
            NodeKind::Package
                | NodeKind::FunctionGroupsFolder
                | NodeKind::ProgramsFolder
                | NodeKind::ClassesFolder
                | NodeKind::UncategorizedFolder
                | NodeKind::FgFunctionModulesFolder
                | NodeKind::FgIncludesFolder
        )
    }
}

/// One node of the navigator tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Deterministic id, unique within the tree
    pub id: String,
    /// Display label
    pub label: String,
    /// Node role
    pub kind: NodeKind,
    /// Ordered children
    pub children: Vec<TreeNode>,
    /// Item the node stands for, absent on containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    /// Initial expansion hint for presentation layers
    pub expanded_by_default: bool,
}

impl TreeNode {
    /// A container node that is open by default
    pub fn folder(id: impl Into<String>, label: impl Into<String>, kind: NodeKind, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            children,
            item_id: None,
            expanded_by_default: true,
        }
    }

    /// A node backed by an uploaded item; open by default only when it has children
    pub fn item(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: NodeKind,
        item_id: &ItemId,
        children: Vec<TreeNode>,
    ) -> Self {
        let expanded_by_default = !children.is_empty();
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            children,
            item_id: Some(item_id.clone()),
            expanded_by_default,
        }
    }

    /// A childless node backed by an uploaded item
    pub fn leaf(id: impl Into<String>, label: impl Into<String>, kind: NodeKind, item_id: &ItemId) -> Self {
        Self::item(id, label, kind, item_id, Vec::new())
    }

    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
