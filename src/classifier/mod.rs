//! Object classification for uploaded ABAP files.
//!
//! A file is first classified by its name ([`filename`]) and, when that is
//! inconclusive, by its content ([`refine`]). Classification is a pure
//! function of name and content and is recomputed on every tree build.

pub mod filename;
pub mod refine;

use serde::{Deserialize, Serialize};

use crate::model::{ItemId, UploadedItem};

pub use filename::classify_filename;
pub use refine::refine_with_content;

/// Object type detected for a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedType {
    /// `SAPL<group>` function group main program
    FgMain,
    /// `L<group>TOP` global data include
    FgTop,
    /// `L<group>UXX` function module registry
    FgUxx,
    /// `L<group>FXX` form routine registry
    FgFxx,
    /// `L<group>U##` function module body
    FgFuncInclude,
    /// `L<group>F##`, `I##`, `O##` form/screen include
    FgFormInclude,
    /// Report or module pool
    Program,
    /// `<prog>_TOP`
    ProgramTop,
    /// `<prog>_PBO` or `<prog>_O##`
    ProgramPbo,
    /// `<prog>_PAI`
    ProgramPai,
    /// `<prog>_F##`
    ProgramFormInclude,
    /// `<prog>_I##`
    ProgramInclude,
    /// Class pool
    Class,
    /// Interface pool
    Interface,
    /// Generic include recognized only by its FORM bodies
    Include,
    /// Nothing matched
    Unknown,
}

impl DetectedType {
    /// Members of a function group
    pub fn is_function_group_part(self) -> bool {
        matches!(
            self,
            DetectedType::FgMain
                | DetectedType::FgTop
                | DetectedType::FgUxx
                | DetectedType::FgFxx
                | DetectedType::FgFuncInclude
                | DetectedType::FgFormInclude
        )
    }

    /// Members of a program and its includes
    pub fn is_program_part(self) -> bool {
        matches!(
            self,
            DetectedType::Program
                | DetectedType::ProgramTop
                | DetectedType::ProgramPbo
                | DetectedType::ProgramPai
                | DetectedType::ProgramFormInclude
                | DetectedType::ProgramInclude
        )
    }

    /// Class or interface
    pub fn is_class_like(self) -> bool {
        matches!(self, DetectedType::Class | DetectedType::Interface)
    }
}

/// Detected type plus the logical parent object it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Detected object type
    pub detected: DetectedType,
    /// Function group or program name the file belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
}

impl Classification {
    /// The fallback result when no rule applies
    pub fn unknown() -> Self {
        Self {
            detected: DetectedType::Unknown,
            group_key: None,
        }
    }
}

/// Classification of one uploaded item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFile {
    /// Item the classification was derived from
    pub item_id: ItemId,
    /// Display name including extension
    pub file_name: String,
    /// Name without its last extension
    pub base_name: String,
    /// Current classification
    pub classification: Classification,
}

impl DetectedFile {
    /// Detected type shortcut
    pub fn detected(&self) -> DetectedType {
        self.classification.detected
    }

    /// Group key, falling back to the base name for ungrouped files
    pub fn group_key_or_base(&self) -> &str {
        self.classification
            .group_key
            .as_deref()
            .unwrap_or(&self.base_name)
    }
}

/// Classifies one item by name, then refines with its content if needed
pub fn classify_item(item: &UploadedItem) -> DetectedFile {
    let by_name = classify_filename(&item.name);
    let classification = refine_with_content(by_name, item.content.as_deref());
    DetectedFile {
        item_id: item.id.clone(),
        file_name: item.name.clone(),
        base_name: item.base_name().to_string(),
        classification,
    }
}
