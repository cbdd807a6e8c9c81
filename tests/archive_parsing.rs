mod common;

use abapdocgen::archive::metadata::{parse_table_xml, LenientTagExtractor};
use abapdocgen::archive::{parse_archive, ParsedMetadata};
use abapdocgen::{loader, ObjectType, Workspace};
use common::test_helpers::{build_zip, setup_test_logger, TABLE_XML};
use pretty_assertions::assert_eq;

const FUGR_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<abapGit version="v1.0.0" serializer="LCL_OBJECT_FUGR" serializer_version="v1.0.0">
 <asx:abap xmlns:asx="http://www.sap.com/abapxml" version="1.0">
  <asx:values>
   <AREAT>Foo functions</AREAT>
   <INCLUDES>
    <SOBJ_NAME>LZFOOTOP</SOBJ_NAME>
    <SOBJ_NAME>SAPLZFOO</SOBJ_NAME>
   </INCLUDES>
   <FUNCTIONS>
    <item>
     <FUNCNAME>Z_FOO_GET</FUNCNAME>
     <SHORT_TEXT>Read foo</SHORT_TEXT>
     <IMPORT>
      <RSIMP>
       <PARAMETER>IV_LGNUM</PARAMETER>
       <TYP>/SCWM/LGNUM</TYP>
      </RSIMP>
     </IMPORT>
    </item>
   </FUNCTIONS>
  </asx:values>
 </asx:abap>
</abapGit>
"#;

fn sample_archive() -> Vec<u8> {
    build_zip(&[
        ("src/", ""),
        (".abapgit.xml", "<DATA><MASTER_LANGUAGE>E</MASTER_LANGUAGE></DATA>"),
        ("src/.abapgit.xml", "<DATA/>"),
        ("src/zfoo.fugr.xml", FUGR_XML),
        ("src/zfoo.fugr.lzfootop.abap", "FUNCTION-POOL zfoo."),
        ("src/zfoo.fugr.z_foo_get.abap", "FUNCTION z_foo_get.\nENDFUNCTION."),
        ("src/zs_foo.tabl.xml", TABLE_XML),
        ("src/zrep.prog.abap", "REPORT zrep."),
        ("src/zform.sfpf.xdp", "<xdp/>"),
        ("__MACOSX/src/._zrep.prog.abap", "junk"),
        ("src/package.devc.xml", "<DEVC/>"),
    ])
}

#[test]
fn abapgit_config_is_never_extracted() {
    setup_test_logger();
    let result = parse_archive(&sample_archive()).unwrap();

    assert!(result.files.iter().all(|f| f.name != ".abapgit.xml"));
    assert!(result
        .objects
        .iter()
        .flat_map(|o| o.source_files.iter().chain(o.metadata_file.iter()))
        .all(|f| f.name != ".abapgit.xml"));
    assert!(!result.objects.iter().any(|o| o.name.is_empty()));
}

#[test]
fn files_of_one_object_are_grouped() {
    let result = parse_archive(&sample_archive()).unwrap();
    let names: Vec<&str> = result.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["ZFOO", "ZS_FOO", "ZREP", "PACKAGE"]);

    let fugr = &result.objects[0];
    assert_eq!(fugr.object_type, ObjectType::Fugr);
    assert_eq!(fugr.source_files.len(), 2);
    assert_eq!(fugr.metadata_file.as_ref().unwrap().file_type, ".fugr.xml");
    assert_eq!(fugr.description, "Function Group with 1 FM(s)");
    match fugr.parsed_metadata.as_ref().unwrap() {
        ParsedMetadata::FunctionGroup(record) => {
            assert_eq!(record.name, "ZFOO");
            assert_eq!(record.functions[0].importing[0].name, "IV_LGNUM");
        }
        other => panic!("unexpected metadata {:?}", other),
    }

    let package = &result.objects[3];
    assert_eq!(package.object_type, ObjectType::Other);
    assert!(package.parsed_metadata.is_none());
}

#[test]
fn stats_are_derived_from_the_result() {
    let stats = parse_archive(&sample_archive()).unwrap().stats;
    assert_eq!(stats.total_files, 6);
    assert_eq!(stats.abap_files, 3);
    assert_eq!(stats.xml_files, 3);
    assert_eq!(stats.function_groups, 1);
    assert_eq!(stats.structures, 1);
    assert_eq!(stats.programs, 1);
    assert_eq!(stats.classes, 0);
    assert_eq!(stats.by_type.get(&ObjectType::Other), Some(&1));
}

#[test]
fn structure_keeps_only_named_fields_in_order() {
    let record = parse_table_xml(&LenientTagExtractor::new(), TABLE_XML)
        .unwrap()
        .unwrap();
    assert_eq!(record.name, "ZFOO");
    assert_eq!(record.description, "Foo structure");
    let fields: Vec<(&str, u32)> = record
        .fields
        .iter()
        .map(|f| (f.field_name.as_str(), f.position))
        .collect();
    assert_eq!(fields, vec![("LGNUM", 1), ("HUIDENT", 3)]);
}

#[test]
fn metadata_context_lists_parsed_kinds_in_order() {
    let result = parse_archive(&sample_archive()).unwrap();
    let context = result.metadata_context();

    let structures = context.find("## Data Dictionary - Structures & Tables").unwrap();
    let groups = context.find("## Function Groups").unwrap();
    assert!(structures < groups);
    assert!(context.contains("| 3 | HUIDENT | /SCWM/DE_HUIDENT | CHAR | 000020 |"));
    assert!(context.contains("- IV_LGNUM TYPE /SCWM/LGNUM - "));
    assert!(!context.contains("## Classes"));
}

#[test]
fn binary_entries_are_skipped() {
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("src/zok.prog.abap", FileOptions::default()).unwrap();
    writer.write_all(b"REPORT zok.").unwrap();
    writer.start_file("src/zbin.prog.abap", FileOptions::default()).unwrap();
    writer.write_all(&[0, 1, 2, 0, 255]).unwrap();
    writer.start_file("src/zlatin.prog.abap", FileOptions::default()).unwrap();
    writer.write_all(&[b'R', 0xe9, b'.']).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let result = parse_archive(&bytes).unwrap();
    let names: Vec<&str> = result.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["zok.prog.abap"]);
    assert_eq!(result.objects.len(), 1);
}

#[tokio::test]
async fn archive_files_become_workspace_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.zip");
    std::fs::write(&path, sample_archive()).unwrap();

    let result = loader::load_archive(&path).await.unwrap();
    let mut workspace = Workspace::new("Export");
    let ids = workspace.add_archive_files(&result);

    assert_eq!(ids.len(), result.files.len());
    assert!(workspace.items().iter().all(|i| i.content.is_some()));
    assert_eq!(workspace.items()[0].name, "zfoo.fugr.xml");
}
