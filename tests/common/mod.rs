#![allow(dead_code)]

use std::io::{Cursor, Write};

use abapdocgen::{ItemId, UploadedItem};
use zip::write::FileOptions;
use zip::ZipWriter;

pub mod test_helpers {
    use super::*;

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// A loaded item whose id equals its name
    pub fn item(name: &str, content: &str) -> UploadedItem {
        UploadedItem::loaded(ItemId::new(name), name, content)
    }

    /// Builds an in-memory ZIP archive from (path, content) pairs
    pub fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for (path, content) in files {
            if path.ends_with('/') {
                writer.add_directory(*path, options).expect("add directory");
            } else {
                writer.start_file(*path, options).expect("start file");
                writer.write_all(content.as_bytes()).expect("write file");
            }
        }
        writer.finish().expect("finish zip").into_inner()
    }

    pub const TABLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<abapGit version="v1.0.0" serializer="LCL_OBJECT_TABL" serializer_version="v1.0.0">
 <asx:abap xmlns:asx="http://www.sap.com/abapxml" version="1.0">
  <asx:values>
   <DD02V>
    <TABNAME>ZFOO</TABNAME>
    <DDLANGUAGE>E</DDLANGUAGE>
    <TABCLASS>INTTAB</TABCLASS>
    <DDTEXT>Foo structure</DDTEXT>
   </DD02V>
   <DD03P_TABLE>
    <DD03P>
     <FIELDNAME>LGNUM</FIELDNAME>
     <POSITION>0001</POSITION>
     <ROLLNAME>/SCWM/LGNUM</ROLLNAME>
    </DD03P>
    <DD03P>
     <POSITION>0002</POSITION>
     <ROLLNAME>ORPHAN</ROLLNAME>
    </DD03P>
    <DD03P>
     <FIELDNAME>HUIDENT</FIELDNAME>
     <POSITION>0003</POSITION>
     <ROLLNAME>/SCWM/DE_HUIDENT</ROLLNAME>
     <DATATYPE>CHAR</DATATYPE>
     <LENG>000020</LENG>
    </DD03P>
   </DD03P_TABLE>
  </asx:values>
 </asx:abap>
</abapGit>
"#;
}
