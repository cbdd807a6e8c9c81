//! Grouping of archive entries into abapGit objects.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::metadata::{extract_metadata, LenientTagExtractor, TagExtractor};
use super::{ArchiveEntry, ArchiveFile, ArchiveParseResult, ArchiveStats, ExtractedObject, ObjectType};

const MACOS_METADATA_MARKER: &str = "__MACOSX";
const ABAPGIT_CONFIG_FILE: &str = ".abapgit.xml";
const ACCEPTED_EXTENSIONS: [&str; 2] = [".abap", ".xml"];

/// Why an entry was left out of the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Directory,
    MacosMetadata,
    Extension,
    ConfigFile,
}

fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Last extension including the dot, lower-cased; the whole name when there is no dot
fn last_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => file_name.to_lowercase(),
    }
}

fn skip_reason(entry: &ArchiveEntry) -> Option<SkipReason> {
    if entry.is_dir {
        return Some(SkipReason::Directory);
    }
    if entry.path.contains(MACOS_METADATA_MARKER) {
        return Some(SkipReason::MacosMetadata);
    }
    let file_name = file_name_of(&entry.path);
    if !ACCEPTED_EXTENSIONS.contains(&last_extension(file_name).as_str()) {
        return Some(SkipReason::Extension);
    }
    if file_name == ABAPGIT_CONFIG_FILE {
        return Some(SkipReason::ConfigFile);
    }
    None
}

/// First dot segment, upper-cased
fn object_name_of(file_name: &str) -> String {
    file_name.split('.').next().unwrap_or(file_name).to_uppercase()
}

/// Everything from the first dot, empty when there is none
fn file_type_of(file_name: &str) -> String {
    file_name
        .find('.')
        .map(|idx| file_name[idx..].to_string())
        .unwrap_or_default()
}

/// Whether an XML file is the object's own descriptor (`zfoo.fugr.xml`)
/// rather than one of its sub-object files (`zfoo.fugr.lzfootop.xml`)
fn is_primary_metadata(file: &ArchiveFile) -> bool {
    let file_type = file.file_type.to_lowercase();
    file_type.ends_with(".xml") && !file_type.contains(".iatu.") && file_type.matches('.').count() <= 2
}

/// Filters, decodes and groups raw archive entries into objects.
///
/// Never fails: undecodable entries are skipped and metadata extraction
/// errors leave the affected object without parsed metadata.
pub fn parse_archive_entries(entries: &[ArchiveEntry]) -> ArchiveParseResult {
    parse_archive_entries_with(&LenientTagExtractor::new(), entries)
}

/// [`parse_archive_entries`] with an explicit tag extractor
pub fn parse_archive_entries_with(tags: &impl TagExtractor, entries: &[ArchiveEntry]) -> ArchiveParseResult {
    let mut files = Vec::new();
    let mut objects: Vec<ExtractedObject> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        if let Some(reason) = skip_reason(entry) {
            debug!("skipping archive entry {}: {:?}", entry.path, reason);
            continue;
        }

        let content = match entry.text() {
            Ok(content) => content,
            Err(e) => {
                debug!("skipping archive entry {}: {}", entry.path, e);
                continue;
            }
        };

        let name = file_name_of(&entry.path).to_string();
        let file = ArchiveFile {
            path: entry.path.clone(),
            object_type: ObjectType::detect(&name),
            object_name: object_name_of(&name),
            file_type: file_type_of(&name),
            name,
            content,
        };

        let idx = *positions.entry(file.object_name.clone()).or_insert_with(|| {
            objects.push(ExtractedObject::new(file.object_name.clone(), file.object_type));
            objects.len() - 1
        });
        let object = &mut objects[idx];

        if file.is_source() {
            object.source_files.push(file.clone());
        } else if object.metadata_file.is_none() && is_primary_metadata(&file) {
            attach_metadata(tags, object, &file);
        }

        files.push(file);
    }

    let stats = ArchiveStats::compute(&files, &objects);
    info!(
        "parsed archive: {} file(s), {} object(s), {} with metadata",
        stats.total_files,
        objects.len(),
        objects.iter().filter(|o| o.parsed_metadata.is_some()).count()
    );

    ArchiveParseResult { files, objects, stats }
}

fn attach_metadata(tags: &impl TagExtractor, object: &mut ExtractedObject, file: &ArchiveFile) {
    object.metadata_file = Some(file.clone());
    match extract_metadata(tags, object.object_type, &file.content) {
        Ok(Some(parsed)) => {
            object.description = parsed.description();
            object.parsed_metadata = Some(parsed);
        }
        Ok(None) => debug!("no {} record in {}", object.object_type, file.path),
        Err(e) => warn!("metadata extraction failed for {}: {}", file.path, e),
    }
}
