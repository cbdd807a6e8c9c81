mod common;

use abapdocgen::{classify_filename, classify_item, refine_with_content, Classification, DetectedType};
use common::test_helpers::item;
use proptest::prelude::*;

fn program_name() -> impl Strategy<Value = String> {
    "Z[A-Z0-9]{1,15}".prop_filter("class and interface prefixes", |name| {
        !name.starts_with("ZCL") && !name.starts_with("ZIF")
    })
}

proptest! {
    #[test]
    fn sapl_names_are_function_group_mains(group in "[A-Z0-9_/]{1,20}") {
        let result = classify_filename(&format!("SAPL{}.abap", group));
        prop_assert_eq!(result.detected, DetectedType::FgMain);
        prop_assert_eq!(result.group_key, Some(group));
    }

    #[test]
    fn program_include_suffixes(name in program_name()) {
        let cases = [
            ("_TOP", DetectedType::ProgramTop),
            ("_PBO", DetectedType::ProgramPbo),
            ("_PAI", DetectedType::ProgramPai),
            ("_O01", DetectedType::ProgramPbo),
        ];
        for (suffix, detected) in cases {
            let result = classify_filename(&format!("{}{}.abap", name, suffix));
            prop_assert_eq!(result.detected, detected);
            prop_assert_eq!(result.group_key.as_deref(), Some(name.as_str()));
        }
    }

    #[test]
    fn classification_is_idempotent(name in "[A-Za-z0-9_.]{0,24}") {
        prop_assert_eq!(classify_filename(&name), classify_filename(&name));
    }

    #[test]
    fn content_never_overrides_specific_types(content in ".{0,200}") {
        let top = Classification {
            detected: DetectedType::FgTop,
            group_key: Some("ZGRP".to_string()),
        };
        prop_assert_eq!(refine_with_content(top.clone(), Some(&content)), top);
    }
}

#[test]
fn lower_case_names_are_normalized() {
    let result = classify_filename("lzwm_fg_bin_blocktop.abap");
    assert_eq!(result.detected, DetectedType::FgTop);
    assert_eq!(result.group_key.as_deref(), Some("ZWM_FG_BIN_BLOCK"));
}

#[test]
fn content_refines_unrecognized_names() {
    let report = classify_item(&item("upload.txt", "report zsales_overview.\n"));
    assert_eq!(report.detected(), DetectedType::Program);
    assert_eq!(report.group_key_or_base(), "ZSALES_OVERVIEW");

    let class = classify_item(&item("snippet.abap", "CLASS lcl_app DEFINITION FINAL."));
    assert_eq!(class.detected(), DetectedType::Class);

    let unknown = classify_item(&item("notes.txt", "just text"));
    assert_eq!(unknown.detected(), DetectedType::Unknown);
}

#[test]
fn pending_items_keep_name_classification() {
    let pending = abapdocgen::UploadedItem::pending(
        abapdocgen::ItemId::new("p"),
        "upload.txt",
        100,
        abapdocgen::FileCategory::MainLogic,
    );
    assert_eq!(classify_item(&pending).detected(), DetectedType::Unknown);
}
