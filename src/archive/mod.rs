//! abapGit archive handling.
//!
//! An exported repository is a ZIP of `.abap` sources and `.xml` metadata
//! files named `<object>.<type>[.<sub>].<ext>`. [`reader`] turns the archive
//! into raw entries, [`objects`] filters and groups them per object,
//! [`metadata`] extracts typed records from the XML and [`markdown`] renders
//! those records as context text.

pub mod markdown;
pub mod metadata;
pub mod objects;
pub mod reader;

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use markdown::build_metadata_context;
pub use metadata::ParsedMetadata;
pub use objects::parse_archive_entries;
pub use reader::{decode_text, decode_text_file, read_zip_entries, ArchiveEntry};

/// abapGit object type, keyed by the type segment of the file name
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Fugr,
    Clas,
    Prog,
    Tabl,
    Dtel,
    Doma,
    Ttyp,
    Tran,
    Enho,
    Tobj,
    View,
    Shlp,
    Nrob,
    Sicf,
    Sxci,
    Acid,
    Sfpf,
    Sfpi,
    Iwsg,
    Iwom,
    Sprx,
    Smim,
    Iatu,
    Other,
}

impl ObjectType {
    /// Detection order; the first marker found in a file name wins
    pub const DETECTABLE: [ObjectType; 23] = [
        ObjectType::Fugr,
        ObjectType::Clas,
        ObjectType::Prog,
        ObjectType::Tabl,
        ObjectType::Dtel,
        ObjectType::Doma,
        ObjectType::Ttyp,
        ObjectType::Tran,
        ObjectType::Enho,
        ObjectType::Tobj,
        ObjectType::View,
        ObjectType::Shlp,
        ObjectType::Nrob,
        ObjectType::Sicf,
        ObjectType::Sxci,
        ObjectType::Acid,
        ObjectType::Sfpf,
        ObjectType::Sfpi,
        ObjectType::Iwsg,
        ObjectType::Iwom,
        ObjectType::Sprx,
        ObjectType::Smim,
        ObjectType::Iatu,
    ];

    /// Four-letter abapGit code
    pub fn code(self) -> &'static str {
        match self {
            ObjectType::Fugr => "FUGR",
            ObjectType::Clas => "CLAS",
            ObjectType::Prog => "PROG",
            ObjectType::Tabl => "TABL",
            ObjectType::Dtel => "DTEL",
            ObjectType::Doma => "DOMA",
            ObjectType::Ttyp => "TTYP",
            ObjectType::Tran => "TRAN",
            ObjectType::Enho => "ENHO",
            ObjectType::Tobj => "TOBJ",
            ObjectType::View => "VIEW",
            ObjectType::Shlp => "SHLP",
            ObjectType::Nrob => "NROB",
            ObjectType::Sicf => "SICF",
            ObjectType::Sxci => "SXCI",
            ObjectType::Acid => "ACID",
            ObjectType::Sfpf => "SFPF",
            ObjectType::Sfpi => "SFPI",
            ObjectType::Iwsg => "IWSG",
            ObjectType::Iwom => "IWOM",
            ObjectType::Sprx => "SPRX",
            ObjectType::Smim => "SMIM",
            ObjectType::Iatu => "IATU",
            ObjectType::Other => "OTHER",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::Fugr => "Function Group",
            ObjectType::Clas => "Class",
            ObjectType::Prog => "Program",
            ObjectType::Tabl => "Structure / Table",
            ObjectType::Dtel => "Data Element",
            ObjectType::Doma => "Domain",
            ObjectType::Ttyp => "Table Type",
            ObjectType::Tran => "Transaction",
            ObjectType::Enho => "Enhancement",
            ObjectType::Tobj => "Table Maint. Object",
            ObjectType::View => "View",
            ObjectType::Shlp => "Search Help",
            ObjectType::Nrob => "Number Range",
            ObjectType::Sicf => "ICF Service",
            ObjectType::Sxci => "BAdI Implementation",
            ObjectType::Acid => "Activation ID",
            ObjectType::Sfpf => "Adobe Form",
            ObjectType::Sfpi => "Adobe Form Interface",
            ObjectType::Iwsg => "OData Service",
            ObjectType::Iwom => "OData Model",
            ObjectType::Sprx => "Proxy",
            ObjectType::Smim => "MIME Object",
            ObjectType::Iatu => "ITS Template",
            ObjectType::Other => "Other",
        }
    }

    /// Detects the type from a file name such as `zfoo.fugr.xml`
    pub fn detect(file_name: &str) -> ObjectType {
        let lower = file_name.to_lowercase();
        ObjectType::DETECTABLE
            .iter()
            .copied()
            .find(|object_type| lower.contains(&format!(".{}.", object_type.code().to_lowercase())))
            .unwrap_or(ObjectType::Other)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One accepted text entry of an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFile {
    /// Full path inside the archive
    pub path: String,
    /// Last path segment
    pub name: String,
    /// Decoded text
    pub content: String,
    /// Type detected from the name
    pub object_type: ObjectType,
    /// First dot segment of the name, upper-cased
    pub object_name: String,
    /// Everything from the first dot, e.g. `.fugr.xml`
    pub file_type: String,
}

impl ArchiveFile {
    /// Whether this is an ABAP source file
    pub fn is_source(&self) -> bool {
        has_extension(&self.name, "abap")
    }

    /// Whether this is an XML metadata file
    pub fn is_metadata(&self) -> bool {
        has_extension(&self.name, "xml")
    }
}

/// All files of one logical ABAP object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedObject {
    /// Object name, the grouping key
    pub name: String,
    /// Type of the first file seen for this object
    pub object_type: ObjectType,
    /// Description taken from parsed metadata, empty otherwise
    pub description: String,
    /// `.abap` files in archive order
    pub source_files: Vec<ArchiveFile>,
    /// The object's primary XML file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_file: Option<ArchiveFile>,
    /// Record extracted from the metadata file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_metadata: Option<ParsedMetadata>,
}

impl ExtractedObject {
    pub(crate) fn new(name: String, object_type: ObjectType) -> Self {
        Self {
            name,
            object_type,
            description: String::new(),
            source_files: Vec::new(),
            metadata_file: None,
            parsed_metadata: None,
        }
    }
}

/// Summary counts over an archive parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Accepted entries
    pub total_files: usize,
    /// Accepted `.abap` entries
    pub abap_files: usize,
    /// Accepted `.xml` entries
    pub xml_files: usize,
    /// TABL objects
    pub structures: usize,
    /// DTEL objects
    pub data_elements: usize,
    /// FUGR objects
    pub function_groups: usize,
    /// CLAS objects
    pub classes: usize,
    /// PROG objects
    pub programs: usize,
    /// Object count for every type present
    pub by_type: BTreeMap<ObjectType, usize>,
}

impl ArchiveStats {
    /// Derives the counts from the final file and object lists
    pub fn compute(files: &[ArchiveFile], objects: &[ExtractedObject]) -> Self {
        let mut by_type = BTreeMap::new();
        for object in objects {
            *by_type.entry(object.object_type).or_insert(0) += 1;
        }
        let count = |object_type: ObjectType| by_type.get(&object_type).copied().unwrap_or(0);

        Self {
            total_files: files.len(),
            abap_files: files.iter().filter(|f| f.is_source()).count(),
            xml_files: files.iter().filter(|f| f.is_metadata()).count(),
            structures: count(ObjectType::Tabl),
            data_elements: count(ObjectType::Dtel),
            function_groups: count(ObjectType::Fugr),
            classes: count(ObjectType::Clas),
            programs: count(ObjectType::Prog),
            by_type,
        }
    }
}

/// Result of parsing one archive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveParseResult {
    /// Accepted text entries in archive order
    pub files: Vec<ArchiveFile>,
    /// Entries grouped per object, in first-seen order
    pub objects: Vec<ExtractedObject>,
    /// Summary counts
    pub stats: ArchiveStats,
}

impl ArchiveParseResult {
    /// Metadata context for every object with parsed metadata
    pub fn metadata_context(&self) -> String {
        build_metadata_context(&self.objects)
    }
}

lazy_static! {
    static ref ZIP_NAME: Regex = Regex::new(r"(?i)\.zip$").unwrap();
}

/// Whether a file name denotes a ZIP archive
pub fn is_zip_file(name: &str) -> bool {
    ZIP_NAME.is_match(name)
}

/// Reads and parses an in-memory ZIP archive
pub fn parse_archive(bytes: &[u8]) -> Result<ArchiveParseResult> {
    let entries = read_zip_entries(bytes)?;
    Ok(parse_archive_entries(&entries))
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, candidate)| candidate.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_object_type() {
        assert_eq!(ObjectType::detect("zfoo.fugr.xml"), ObjectType::Fugr);
        assert_eq!(ObjectType::detect("ZCL_X.CLAS.ABAP"), ObjectType::Clas);
        assert_eq!(ObjectType::detect("zs_item.tabl.xml"), ObjectType::Tabl);
        assert_eq!(ObjectType::detect("package.devc.xml"), ObjectType::Other);
        // the marker needs dots on both sides
        assert_eq!(ObjectType::detect("zprog.abap"), ObjectType::Other);
    }

    #[test]
    fn test_codes_and_labels() {
        assert_eq!(ObjectType::Tobj.label(), "Table Maint. Object");
        assert_eq!(ObjectType::Other.code(), "OTHER");
        assert_eq!(serde_json::to_string(&ObjectType::Dtel).unwrap(), "\"DTEL\"");
        for object_type in ObjectType::DETECTABLE {
            let name = format!("x.{}.xml", object_type.code().to_lowercase());
            assert_eq!(ObjectType::detect(&name), object_type);
        }
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file("export.zip"));
        assert!(is_zip_file("EXPORT.ZIP"));
        assert!(!is_zip_file("export.zip.bak"));
        assert!(!is_zip_file("zip"));
    }
}
