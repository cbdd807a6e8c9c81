//! Uploaded source items and their user-facing categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DocGenError;

/// Stable identifier of an uploaded item, unique within one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an explicit identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Category label a user can assign to an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    /// Executable program logic
    #[serde(rename = "Main Logic")]
    MainLogic,
    /// Dictionary definitions
    #[serde(rename = "Data Dictionary")]
    DataDictionary,
    /// Include fragment
    Include,
    /// Function module source
    #[serde(rename = "Function Module")]
    FunctionModule,
    /// Class or interface source
    Class,
    /// Documentation template, never sent as source
    Template,
}

impl FileCategory {
    /// All categories in display order
    pub const ALL: [FileCategory; 6] = [
        FileCategory::MainLogic,
        FileCategory::DataDictionary,
        FileCategory::Include,
        FileCategory::FunctionModule,
        FileCategory::Class,
        FileCategory::Template,
    ];

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::MainLogic => "Main Logic",
            FileCategory::DataDictionary => "Data Dictionary",
            FileCategory::Include => "Include",
            FileCategory::FunctionModule => "Function Module",
            FileCategory::Class => "Class",
            FileCategory::Template => "Template",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileCategory {
    type Err = DocGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FileCategory::ALL
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DocGenError::Validation(format!("Unknown file category: {}", s)))
    }
}

/// One unit of source text supplied by the user or extracted from an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedItem {
    /// Session-unique identifier
    pub id: ItemId,
    /// Display name, usually the file name including extension
    pub name: String,
    /// Size in bytes as reported at upload time
    pub size: u64,
    /// User-assignable category
    pub category: FileCategory,
    /// Text content, absent until loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UploadedItem {
    /// Creates an item whose content has not been read yet
    pub fn pending(id: ItemId, name: impl Into<String>, size: u64, category: FileCategory) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            category,
            content: None,
        }
    }

    /// Creates an item with its content already resident
    pub fn loaded(id: ItemId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id,
            name: name.into(),
            size: content.len() as u64,
            category: FileCategory::MainLogic,
            content: Some(content),
        }
    }

    /// File name with its last extension removed
    pub fn base_name(&self) -> &str {
        strip_extension(&self.name)
    }

    /// Whether the item is a documentation template rather than source
    pub fn is_template(&self) -> bool {
        self.category == FileCategory::Template
    }
}

/// Removes the last `.ext` suffix from a file name, if any
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}
