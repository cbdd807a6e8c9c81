//! Session item collection.

use log::debug;

use crate::archive::ArchiveParseResult;
use crate::model::{FileCategory, ItemId, UploadedItem};
use crate::tree::{build_tree, TreeNode};

/// Ordered collection of uploaded items for one session.
///
/// Items are looked up by id, so results of concurrent reads can be applied
/// in any order. The tree is always rebuilt from the full collection.
#[derive(Debug, Clone)]
pub struct Workspace {
    package_name: String,
    items: Vec<UploadedItem>,
}

impl Workspace {
    /// Creates an empty workspace whose tree root carries `package_name`
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            items: Vec::new(),
        }
    }

    /// Label of the tree root
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Registers an item whose content is still being read
    pub fn add_pending(&mut self, name: impl Into<String>, size: u64, category: FileCategory) -> ItemId {
        let id = ItemId::generate();
        self.items.push(UploadedItem::pending(id.clone(), name, size, category));
        id
    }

    /// Adds an item with resident content
    pub fn add_loaded(&mut self, name: impl Into<String>, content: impl Into<String>, category: FileCategory) -> ItemId {
        let id = ItemId::generate();
        let mut item = UploadedItem::loaded(id.clone(), name, content);
        item.category = category;
        self.items.push(item);
        id
    }

    /// Stores loaded content; returns `false` when the item no longer exists
    pub fn apply_content(&mut self, id: &ItemId, content: String) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.content = Some(content);
                true
            }
            None => {
                debug!("dropping content for removed item {}", id);
                false
            }
        }
    }

    /// Removes an item, returning it
    pub fn remove(&mut self, id: &ItemId) -> Option<UploadedItem> {
        let idx = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Changes the category of an item; returns `false` for unknown ids
    pub fn update_category(&mut self, id: &ItemId, category: FileCategory) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.category = category;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole collection with a new batch
    pub fn replace_all(&mut self, items: Vec<UploadedItem>) {
        self.items = items;
    }

    /// Looks up an item by id
    pub fn get(&self, id: &ItemId) -> Option<&UploadedItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// All items in insertion order
    pub fn items(&self) -> &[UploadedItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the workspace holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that are source code rather than templates
    pub fn source_items(&self) -> impl Iterator<Item = &UploadedItem> {
        self.items.iter().filter(|item| !item.is_template())
    }

    /// Documentation template items
    pub fn template_items(&self) -> impl Iterator<Item = &UploadedItem> {
        self.items.iter().filter(|item| item.is_template())
    }

    /// Adds one loaded item per accepted archive entry, returning their ids
    pub fn add_archive_files(&mut self, result: &ArchiveParseResult) -> Vec<ItemId> {
        result
            .files
            .iter()
            .map(|file| self.add_loaded(file.name.clone(), file.content.clone(), FileCategory::MainLogic))
            .collect()
    }

    /// Builds the navigator tree over the current items
    pub fn build_tree(&self) -> TreeNode {
        build_tree(&self.items, &self.package_name)
    }
}
