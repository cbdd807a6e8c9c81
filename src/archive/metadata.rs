//! Lenient record extraction from abapGit XML.
//!
//! Fields are located by matching `<TAG>...</TAG>` pairs, not by parsing the
//! document. Unknown surrounding tags and element order do not matter, but
//! nested elements with the same tag name are not handled.

use std::collections::HashMap;
use std::sync::Mutex;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ObjectType;
use crate::error::Result;

/// Source of tag contents for the record extractors
pub trait TagExtractor {
    /// Trimmed inner text of the first `<tag>` element, empty when absent
    fn first(&self, xml: &str, tag: &str) -> Result<String>;

    /// Raw inner text of every non-overlapping `<tag>` element
    fn all(&self, xml: &str, tag: &str) -> Result<Vec<String>>;
}

/// Case-insensitive regex-based [`TagExtractor`] with a per-tag pattern cache
#[derive(Debug, Default)]
pub struct LenientTagExtractor {
    patterns: Mutex<HashMap<String, Regex>>,
}

impl LenientTagExtractor {
    /// Creates an extractor with an empty pattern cache
    pub fn new() -> Self {
        Self::default()
    }

    fn pattern(&self, tag: &str) -> Result<Regex> {
        let mut patterns = self.patterns.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(regex) = patterns.get(tag) {
            return Ok(regex.clone());
        }
        let escaped = regex::escape(tag);
        let regex = Regex::new(&format!(r"(?is)<{0}>(.*?)</{0}>", escaped))?;
        patterns.insert(tag.to_string(), regex.clone());
        Ok(regex)
    }
}

impl TagExtractor for LenientTagExtractor {
    fn first(&self, xml: &str, tag: &str) -> Result<String> {
        let regex = self.pattern(tag)?;
        Ok(regex
            .captures(xml)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default())
    }

    fn all(&self, xml: &str, tag: &str) -> Result<Vec<String>> {
        let regex = self.pattern(tag)?;
        Ok(regex
            .captures_iter(xml)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Leading decimal digits as a number, 0 when there are none
fn parse_position(raw: &str) -> u32 {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// One field of a structure or table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureField {
    /// FIELDNAME
    pub field_name: String,
    /// POSITION
    pub position: u32,
    /// ROLLNAME
    pub data_element: String,
    /// DATATYPE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// LENG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// DECIMALS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<String>,
}

/// Structure or table from a `.tabl.xml` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRecord {
    /// TABNAME
    pub name: String,
    /// DDTEXT
    pub description: String,
    /// TABCLASS, e.g. INTTAB or TRANSP
    pub table_class: String,
    /// Named fields in document order
    pub fields: Vec<StructureField>,
}

/// Screen labels of a data element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLabels {
    /// SCRTEXT_S
    pub short: String,
    /// SCRTEXT_M
    pub medium: String,
    /// SCRTEXT_L
    pub long: String,
}

/// Data element from a `.dtel.xml` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataElementRecord {
    /// ROLLNAME
    pub name: String,
    /// DDTEXT
    pub description: String,
    /// DATATYPE
    pub data_type: String,
    /// LENG
    pub length: String,
    /// DECIMALS
    pub decimals: String,
    /// Screen labels
    pub labels: FieldLabels,
}

/// One parameter of a function module interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// PARAMETER
    pub name: String,
    /// TYP
    pub type_name: String,
    /// STEXT
    pub description: String,
}

/// Interface of one function module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionModuleRecord {
    /// FUNCNAME
    pub name: String,
    /// SHORT_TEXT
    pub description: String,
    /// RSIMP entries
    pub importing: Vec<FunctionParameter>,
    /// RSEXP entries
    pub exporting: Vec<FunctionParameter>,
    /// RSCHA entries
    pub changing: Vec<FunctionParameter>,
    /// RSTBL entries
    pub tables: Vec<FunctionParameter>,
    /// RSEXC exception names
    pub exceptions: Vec<String>,
}

/// Function group from a `.fugr.xml` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionGroupRecord {
    /// Group name derived from the first include
    pub name: String,
    /// SOBJ_NAME entries
    pub includes: Vec<String>,
    /// Function modules in document order
    pub functions: Vec<FunctionModuleRecord>,
}

/// Class from a `.clas.xml` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// CLSNAME
    pub name: String,
    /// DESCRIPT
    pub description: String,
    /// REFCLSNAME
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    /// CPDNAME entries
    pub interfaces: Vec<String>,
}

/// Typed metadata attached to an extracted object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParsedMetadata {
    /// TABL
    Structure(StructureRecord),
    /// DTEL
    DataElement(DataElementRecord),
    /// FUGR
    FunctionGroup(FunctionGroupRecord),
    /// CLAS
    Class(ClassRecord),
}

impl ParsedMetadata {
    /// Human description stored on the owning object
    pub fn description(&self) -> String {
        match self {
            ParsedMetadata::Structure(record) => record.description.clone(),
            ParsedMetadata::DataElement(record) => record.description.clone(),
            ParsedMetadata::FunctionGroup(record) if record.functions.is_empty() => {
                "Function Group".to_string()
            }
            ParsedMetadata::FunctionGroup(record) => {
                format!("Function Group with {} FM(s)", record.functions.len())
            }
            ParsedMetadata::Class(record) => record.description.clone(),
        }
    }
}

/// Extracts a structure record; `None` without a TABNAME
pub fn parse_table_xml(tags: &impl TagExtractor, xml: &str) -> Result<Option<StructureRecord>> {
    let name = tags.first(xml, "TABNAME")?;
    if name.is_empty() {
        return Ok(None);
    }

    let mut fields = Vec::new();
    for block in tags.all(xml, "DD03P")? {
        let field_name = tags.first(&block, "FIELDNAME")?;
        if field_name.is_empty() {
            continue;
        }
        fields.push(StructureField {
            field_name,
            position: parse_position(&tags.first(&block, "POSITION")?),
            data_element: tags.first(&block, "ROLLNAME")?,
            data_type: non_empty(tags.first(&block, "DATATYPE")?),
            length: non_empty(tags.first(&block, "LENG")?),
            decimals: non_empty(tags.first(&block, "DECIMALS")?),
        });
    }

    Ok(Some(StructureRecord {
        name,
        description: tags.first(xml, "DDTEXT")?,
        table_class: tags.first(xml, "TABCLASS")?,
        fields,
    }))
}

/// Extracts a data element record; `None` without a ROLLNAME
pub fn parse_data_element_xml(tags: &impl TagExtractor, xml: &str) -> Result<Option<DataElementRecord>> {
    let name = tags.first(xml, "ROLLNAME")?;
    if name.is_empty() {
        return Ok(None);
    }

    Ok(Some(DataElementRecord {
        name,
        description: tags.first(xml, "DDTEXT")?,
        data_type: tags.first(xml, "DATATYPE")?,
        length: tags.first(xml, "LENG")?,
        decimals: tags.first(xml, "DECIMALS")?,
        labels: FieldLabels {
            short: tags.first(xml, "SCRTEXT_S")?,
            medium: tags.first(xml, "SCRTEXT_M")?,
            long: tags.first(xml, "SCRTEXT_L")?,
        },
    }))
}

fn parse_parameters(tags: &impl TagExtractor, block: &str, tag: &str) -> Result<Vec<FunctionParameter>> {
    let mut parameters = Vec::new();
    for entry in tags.all(block, tag)? {
        let name = tags.first(&entry, "PARAMETER")?;
        if name.is_empty() {
            continue;
        }
        parameters.push(FunctionParameter {
            name,
            type_name: tags.first(&entry, "TYP")?,
            description: tags.first(&entry, "STEXT")?,
        });
    }
    Ok(parameters)
}

/// Group name from an include such as `LZFOOTOP`
fn group_name_from_include(include: &str) -> String {
    let mut name = include;
    if name.starts_with(['L', 'l']) {
        name = &name[1..];
    }
    let cut = name.len().saturating_sub(3);
    if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case("TOP") {
        name = &name[..cut];
    }
    name.to_uppercase()
}

/// Extracts a function group record.
///
/// Every function group file yields a record; the name falls back to
/// `UNKNOWN` when no include is listed.
pub fn parse_function_group_xml(tags: &impl TagExtractor, xml: &str) -> Result<Option<FunctionGroupRecord>> {
    let includes: Vec<String> = tags
        .all(xml, "SOBJ_NAME")?
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    let mut functions = Vec::new();
    for item in tags.all(xml, "item")? {
        let name = tags.first(&item, "FUNCNAME")?;
        if name.is_empty() {
            continue;
        }
        let mut exceptions = Vec::new();
        for block in tags.all(&item, "RSEXC")? {
            let exception = tags.first(&block, "EXCEPTION")?;
            if !exception.is_empty() {
                exceptions.push(exception);
            }
        }
        functions.push(FunctionModuleRecord {
            name,
            description: tags.first(&item, "SHORT_TEXT")?,
            importing: parse_parameters(tags, &item, "RSIMP")?,
            exporting: parse_parameters(tags, &item, "RSEXP")?,
            changing: parse_parameters(tags, &item, "RSCHA")?,
            tables: parse_parameters(tags, &item, "RSTBL")?,
            exceptions,
        });
    }

    let name = includes
        .first()
        .map(|include| group_name_from_include(include))
        .unwrap_or_else(|| "UNKNOWN".to_string());

    Ok(Some(FunctionGroupRecord {
        name,
        includes,
        functions,
    }))
}

/// Extracts a class record; `None` without a CLSNAME
pub fn parse_class_xml(tags: &impl TagExtractor, xml: &str) -> Result<Option<ClassRecord>> {
    let name = tags.first(xml, "CLSNAME")?;
    if name.is_empty() {
        return Ok(None);
    }

    let interfaces = tags
        .all(xml, "CPDNAME")?
        .into_iter()
        .map(|iface| iface.trim().to_string())
        .filter(|iface| !iface.is_empty())
        .collect();

    Ok(Some(ClassRecord {
        name,
        description: tags.first(xml, "DESCRIPT")?,
        superclass: non_empty(tags.first(xml, "REFCLSNAME")?),
        interfaces,
    }))
}

/// Runs the extractor matching `object_type`; other types carry no record
pub fn extract_metadata(
    tags: &impl TagExtractor,
    object_type: ObjectType,
    xml: &str,
) -> Result<Option<ParsedMetadata>> {
    let parsed = match object_type {
        ObjectType::Tabl => parse_table_xml(tags, xml)?.map(ParsedMetadata::Structure),
        ObjectType::Dtel => parse_data_element_xml(tags, xml)?.map(ParsedMetadata::DataElement),
        ObjectType::Fugr => parse_function_group_xml(tags, xml)?.map(ParsedMetadata::FunctionGroup),
        ObjectType::Clas => parse_class_xml(tags, xml)?.map(ParsedMetadata::Class),
        _ => None,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocGenError;
    use pretty_assertions::assert_eq;

    fn tags() -> LenientTagExtractor {
        LenientTagExtractor::new()
    }

    #[test]
    fn test_tag_lookup_is_case_insensitive_and_trimmed() {
        let xml = "<asx:values><dd02v><TabName>\n  ZS_ITEM \n</TabName></dd02v></asx:values>";
        assert_eq!(tags().first(xml, "TABNAME").unwrap(), "ZS_ITEM");
        assert_eq!(tags().first(xml, "DDTEXT").unwrap(), "");
    }

    #[test]
    fn test_structure_fields_skip_nameless_blocks() {
        let xml = r#"
            <DD02V><TABNAME>ZS_ITEM</TABNAME><TABCLASS>INTTAB</TABCLASS><DDTEXT>Item</DDTEXT></DD02V>
            <DD03P><FIELDNAME>MATNR</FIELDNAME><POSITION>0001</POSITION><ROLLNAME>MATNR</ROLLNAME></DD03P>
            <DD03P><POSITION>0002</POSITION><ROLLNAME>MENGE_D</ROLLNAME></DD03P>
            <DD03P><FIELDNAME>MEINS</FIELDNAME><POSITION>0003</POSITION><DATATYPE>UNIT</DATATYPE><LENG>000003</LENG></DD03P>
        "#;
        let record = parse_table_xml(&tags(), xml).unwrap().unwrap();
        assert_eq!(record.name, "ZS_ITEM");
        assert_eq!(record.table_class, "INTTAB");
        let names: Vec<_> = record.fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["MATNR", "MEINS"]);
        assert_eq!(record.fields[1].position, 3);
        assert_eq!(record.fields[1].data_type.as_deref(), Some("UNIT"));
        assert_eq!(record.fields[0].length, None);
    }

    #[test]
    fn test_missing_identifying_tag_yields_no_record() {
        let xml = "<DDTEXT>orphan</DDTEXT>";
        assert!(parse_table_xml(&tags(), xml).unwrap().is_none());
        assert!(parse_data_element_xml(&tags(), xml).unwrap().is_none());
        assert!(parse_class_xml(&tags(), xml).unwrap().is_none());
    }

    #[test]
    fn test_name_only_data_element_has_defaults() {
        let record = parse_data_element_xml(&tags(), "<ROLLNAME>ZDE_QTY</ROLLNAME>")
            .unwrap()
            .unwrap();
        assert_eq!(
            record,
            DataElementRecord {
                name: "ZDE_QTY".into(),
                description: String::new(),
                data_type: String::new(),
                length: String::new(),
                decimals: String::new(),
                labels: FieldLabels::default(),
            }
        );
    }

    #[test]
    fn test_function_group_interface() {
        let xml = r#"
            <INCLUDES><SOBJ_NAME>LZFOOTOP</SOBJ_NAME><SOBJ_NAME>SAPLZFOO</SOBJ_NAME></INCLUDES>
            <FUNCTIONS>
             <item>
              <FUNCNAME>Z_FOO_READ</FUNCNAME>
              <SHORT_TEXT>Read foo</SHORT_TEXT>
              <IMPORT><RSIMP><PARAMETER>IV_ID</PARAMETER><TYP>CHAR10</TYP></RSIMP></IMPORT>
              <EXPORT><RSEXP><PARAMETER>ES_FOO</PARAMETER><TYP>ZS_FOO</TYP></RSEXP><RSEXP><TYP>X</TYP></RSEXP></EXPORT>
              <EXCEPTION><RSEXC><EXCEPTION>NOT_FOUND</EXCEPTION></RSEXC></EXCEPTION>
             </item>
            </FUNCTIONS>
            <DOCUMENTATION><item><LANGU>E</LANGU></item></DOCUMENTATION>
        "#;
        let record = parse_function_group_xml(&tags(), xml).unwrap().unwrap();
        assert_eq!(record.name, "ZFOO");
        assert_eq!(record.includes, vec!["LZFOOTOP", "SAPLZFOO"]);
        assert_eq!(record.functions.len(), 1);
        let fm = &record.functions[0];
        assert_eq!(fm.importing[0].type_name, "CHAR10");
        assert_eq!(fm.exporting.len(), 1);
        assert_eq!(fm.exceptions, vec!["NOT_FOUND"]);
        assert_eq!(
            ParsedMetadata::FunctionGroup(record).description(),
            "Function Group with 1 FM(s)"
        );
    }

    #[test]
    fn test_function_group_without_includes() {
        let record = parse_function_group_xml(&tags(), "<AREAT>x</AREAT>").unwrap().unwrap();
        assert_eq!(record.name, "UNKNOWN");
        assert_eq!(ParsedMetadata::FunctionGroup(record).description(), "Function Group");
    }

    #[test]
    fn test_class_record() {
        let xml = "<CLSNAME>ZCL_FOO</CLSNAME><DESCRIPT>Foo</DESCRIPT><REFCLSNAME>ZCL_BASE</REFCLSNAME>\
                   <CPDNAME>ZIF_A</CPDNAME><CPDNAME> </CPDNAME>";
        let record = parse_class_xml(&tags(), xml).unwrap().unwrap();
        assert_eq!(record.superclass.as_deref(), Some("ZCL_BASE"));
        assert_eq!(record.interfaces, vec!["ZIF_A"]);
    }

    struct FailingTags;

    impl TagExtractor for FailingTags {
        fn first(&self, _xml: &str, tag: &str) -> Result<String> {
            Err(DocGenError::Message(format!("cannot read {}", tag)))
        }

        fn all(&self, _xml: &str, tag: &str) -> Result<Vec<String>> {
            Err(DocGenError::Message(format!("cannot read {}", tag)))
        }
    }

    #[test]
    fn test_extractor_errors_propagate() {
        assert!(extract_metadata(&FailingTags, ObjectType::Tabl, "<TABNAME>X</TABNAME>").is_err());
        assert!(extract_metadata(&FailingTags, ObjectType::Prog, "").unwrap().is_none());
    }
}
