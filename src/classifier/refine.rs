//! Content-based refinement of name-based classifications.

use log::debug;

use super::{Classification, DetectedType};
use crate::parser::parse_abap_content;

/// Re-classifies a file from its content when the file name was inconclusive.
///
/// Only `Unknown` and generic `Include` results are touched; anything the
/// naming rules recognized is returned unchanged. Content signals are checked
/// in a fixed order: FUNCTION bodies, REPORT/PROGRAM name, CLASS, INTERFACE,
/// FORM bodies.
pub fn refine_with_content(classification: Classification, content: Option<&str>) -> Classification {
    let content = match content {
        Some(text) if !text.is_empty() => text,
        _ => return classification,
    };

    if !matches!(classification.detected, DetectedType::Unknown | DetectedType::Include) {
        return classification;
    }

    let parsed = parse_abap_content(content);

    let original = classification.detected;
    let refined = if !parsed.functions.is_empty() {
        Classification {
            detected: DetectedType::FgFuncInclude,
            ..classification
        }
    } else if let Some(report) = parsed.report_name {
        Classification {
            detected: DetectedType::Program,
            group_key: Some(report.to_uppercase()),
        }
    } else if parsed.class_name.is_some() {
        Classification {
            detected: DetectedType::Class,
            ..classification
        }
    } else if parsed.interface_name.is_some() {
        Classification {
            detected: DetectedType::Interface,
            ..classification
        }
    } else if !parsed.forms.is_empty() {
        Classification {
            detected: DetectedType::Include,
            ..classification
        }
    } else {
        classification
    };

    if refined.detected != original {
        debug!("content refinement {:?} -> {:?}", original, refined.detected);
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown() -> Classification {
        Classification::unknown()
    }

    #[test]
    fn test_function_wins_over_report() {
        let source = "REPORT zfoo.\nFUNCTION z_get.\nENDFUNCTION.";
        let refined = refine_with_content(unknown(), Some(source));
        assert_eq!(refined.detected, DetectedType::FgFuncInclude);
        assert_eq!(refined.group_key, None);
    }

    #[test]
    fn test_report_sets_upper_case_group_key() {
        let refined = refine_with_content(unknown(), Some("report zsales.\nFORM a.\nENDFORM."));
        assert_eq!(refined.detected, DetectedType::Program);
        assert_eq!(refined.group_key.as_deref(), Some("ZSALES"));
    }

    #[test]
    fn test_class_before_interface() {
        let source = "INTERFACE lif_local.\nENDINTERFACE.\nCLASS lcl_impl IMPLEMENTATION.\nENDCLASS.";
        assert_eq!(refine_with_content(unknown(), Some(source)).detected, DetectedType::Class);
        assert_eq!(
            refine_with_content(unknown(), Some("INTERFACE lif_local.")).detected,
            DetectedType::Interface
        );
    }

    #[test]
    fn test_forms_only_become_generic_include() {
        let refined = refine_with_content(unknown(), Some("FORM a.\nENDFORM."));
        assert_eq!(refined.detected, DetectedType::Include);
    }

    #[test]
    fn test_include_bucket_is_refined_again() {
        let include = Classification { detected: DetectedType::Include, group_key: None };
        let refined = refine_with_content(include, Some("REPORT zbar."));
        assert_eq!(refined.detected, DetectedType::Program);
    }

    #[test]
    fn test_specific_classification_is_trusted() {
        let top = Classification {
            detected: DetectedType::FgTop,
            group_key: Some("ZGRP".into()),
        };
        let refined = refine_with_content(top.clone(), Some("FUNCTION z_x.\nENDFUNCTION."));
        assert_eq!(refined, top);
    }

    #[test]
    fn test_plain_text_stays_unknown() {
        let refined = refine_with_content(unknown(), Some("just some notes"));
        assert_eq!(refined, unknown());
    }

    #[test]
    fn test_missing_or_empty_content_is_left_alone() {
        assert_eq!(refine_with_content(unknown(), None), unknown());
        assert_eq!(refine_with_content(unknown(), Some("")), unknown());
        assert_eq!(refine_with_content(unknown(), Some("DATA lv TYPE i.")), unknown());
    }
}
