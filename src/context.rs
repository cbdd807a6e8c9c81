//! Request payload assembly for a selected subtree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DocGenError, Result};
use crate::model::ItemId;
use crate::tree::{find_node, reachable_item_ids, scope_label, TreeNode};
use crate::workspace::Workspace;

/// One source file included in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Item the text came from
    pub item_id: ItemId,
    /// File name
    pub name: String,
    /// Source text
    pub content: String,
}

/// Everything a documentation request needs about the selected scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Human label of the selected node, e.g. `Function Group: ZFOO`
    pub scope: String,
    /// Source files below the node, in workspace order
    pub sources: Vec<SourceFile>,
    /// Rendered metadata context, possibly empty
    pub metadata: String,
    /// Content of the first template item, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl RequestContext {
    /// Gathers the sources reachable from `node_id`.
    ///
    /// Template items and items whose content is not loaded are left out.
    pub fn for_node(workspace: &Workspace, root: &TreeNode, node_id: &str, metadata_context: &str) -> Result<Self> {
        let node = find_node(root, node_id).ok_or_else(|| DocGenError::NotFound(format!("tree node {}", node_id)))?;
        let reachable: HashSet<ItemId> = reachable_item_ids(node).into_iter().collect();

        let sources = workspace
            .source_items()
            .filter(|item| reachable.contains(&item.id))
            .filter_map(|item| {
                item.content.as_ref().map(|content| SourceFile {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    content: content.clone(),
                })
            })
            .collect();

        let template = workspace
            .template_items()
            .filter_map(|item| item.content.as_ref())
            .find(|content| !content.trim().is_empty())
            .cloned();

        Ok(Self {
            scope: scope_label(node),
            sources,
            metadata: metadata_context.to_string(),
            template,
        })
    }

    /// Whether the scope contains no source text
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Renders the payload as one Markdown document
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.scope));

        for source in &self.sources {
            out.push_str(&format!("### {}\n\n", source.name));
            out.push_str("```abap\n");
            out.push_str(&source.content);
            if !source.content.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        }

        if !self.metadata.trim().is_empty() {
            out.push_str(&self.metadata);
            if !self.metadata.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}
