//! Naming-convention rules for ABAP file names.
//!
//! Rules are evaluated top to bottom and the first match wins. Several
//! patterns overlap (`LZFOOTOP` is also a Z-prefixed name, `SAPLZFOO` also
//! starts with `S`), so the order of [`RULES`] is part of the behavior.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Classification, DetectedType};
use crate::model::strip_extension;

/// Where a rule takes the group key from
#[derive(Debug, Clone, Copy)]
enum GroupKey {
    /// First capture group, rejected when shorter than `min_len`
    Capture { min_len: usize },
    /// The whole upper-cased base name
    WholeName,
    /// The object stands alone
    None,
}

struct FilenameRule {
    pattern: Regex,
    detected: DetectedType,
    group_key: GroupKey,
}

impl FilenameRule {
    fn new(pattern: &str, detected: DetectedType, group_key: GroupKey) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            detected,
            group_key,
        }
    }

    fn apply(&self, base: &str) -> Option<Classification> {
        let caps = self.pattern.captures(base)?;
        let group_key = match self.group_key {
            GroupKey::Capture { min_len } => {
                let key = caps.get(1)?.as_str();
                if key.chars().count() < min_len {
                    return None;
                }
                Some(key.to_string())
            }
            GroupKey::WholeName => Some(base.to_string()),
            GroupKey::None => None,
        };
        Some(Classification {
            detected: self.detected,
            group_key,
        })
    }
}

const FG_KEY: GroupKey = GroupKey::Capture { min_len: 2 };
const ANY_KEY: GroupKey = GroupKey::Capture { min_len: 1 };

lazy_static! {
    static ref RULES: Vec<FilenameRule> = vec![
        // function group
        FilenameRule::new(r"^SAPL(.+)$", DetectedType::FgMain, ANY_KEY),
        FilenameRule::new(r"^L(.+)TOP$", DetectedType::FgTop, FG_KEY),
        FilenameRule::new(r"^L(.+)UXX$", DetectedType::FgUxx, FG_KEY),
        FilenameRule::new(r"^L(.+)FXX$", DetectedType::FgFxx, FG_KEY),
        FilenameRule::new(r"^L(.+)U\d{2,3}$", DetectedType::FgFuncInclude, FG_KEY),
        FilenameRule::new(r"^L(.+)F\d{2,3}$", DetectedType::FgFormInclude, FG_KEY),
        // screen includes share the form bucket at function-group level
        FilenameRule::new(r"^L(.+)I\d{2,3}$", DetectedType::FgFormInclude, FG_KEY),
        FilenameRule::new(r"^L(.+)O\d{2,3}$", DetectedType::FgFormInclude, FG_KEY),
        // classes and interfaces
        FilenameRule::new(r"^(?:[ZY]CL_|CL_)", DetectedType::Class, GroupKey::None),
        FilenameRule::new(r"^(?:[ZY]IF_|IF_)", DetectedType::Interface, GroupKey::None),
        // programs
        FilenameRule::new(r"^SAPM(.+)$", DetectedType::Program, ANY_KEY),
        FilenameRule::new(r"^(.+)_TOP$", DetectedType::ProgramTop, ANY_KEY),
        FilenameRule::new(r"^(.+)_PBO$", DetectedType::ProgramPbo, ANY_KEY),
        FilenameRule::new(r"^(.+)_PAI$", DetectedType::ProgramPai, ANY_KEY),
        FilenameRule::new(r"^(.+)_F\d{2,3}$", DetectedType::ProgramFormInclude, ANY_KEY),
        FilenameRule::new(r"^(.+)_I\d{2,3}$", DetectedType::ProgramInclude, ANY_KEY),
        FilenameRule::new(r"^(.+)_O\d{2,3}$", DetectedType::ProgramPbo, ANY_KEY),
        FilenameRule::new(r"^[ZY]", DetectedType::Program, GroupKey::WholeName),
    ];
}

/// Classifies a file name using SAP naming conventions.
///
/// The last extension is stripped and matching is done on the upper-cased
/// remainder. Names no rule recognizes come back as [`DetectedType::Unknown`].
pub fn classify_filename(file_name: &str) -> Classification {
    let base = strip_extension(file_name).to_uppercase();
    RULES
        .iter()
        .find_map(|rule| rule.apply(&base))
        .unwrap_or_else(Classification::unknown)
}
