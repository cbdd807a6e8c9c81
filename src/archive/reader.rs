//! ZIP entry reading and text decoding.

use std::io::{Cursor, Read};
use std::path::Path;

use log::debug;
use zip::ZipArchive;

use crate::error::{DocGenError, Result};

/// A raw archive entry before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, `/` separated
    pub path: String,
    /// Directory marker
    pub is_dir: bool,
    /// Uncompressed bytes, empty for directories
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// A file entry
    pub fn file(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            data: data.into(),
        }
    }

    /// A directory entry
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            data: Vec::new(),
        }
    }

    /// Decodes the entry as text
    pub fn text(&self) -> Result<String> {
        decode_text(&self.data)
    }
}

/// Decodes bytes as UTF-8 text, rejecting binary content.
///
/// A leading byte-order mark is dropped.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if content_inspector::inspect(bytes).is_binary() {
        return Err(DocGenError::Decode("binary content".into()));
    }
    let text = String::from_utf8(bytes.to_vec())
        .map_err(|e| DocGenError::Decode(format!("invalid UTF-8: {}", e)))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Reads a file from disk and decodes it with [`decode_text`]
pub async fn decode_text_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    decode_text(&bytes)
}

/// Reads every entry of an in-memory ZIP archive.
///
/// A malformed archive is an error; an entry that cannot be read (unsupported
/// compression, corrupt data) is skipped.
pub fn read_zip_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = match archive.by_index(i) {
            Ok(file) => file,
            Err(e) => {
                debug!("skipping archive entry #{}: {}", i, e);
                continue;
            }
        };
        let path = file.name().to_string();

        if file.is_dir() {
            entries.push(ArchiveEntry::dir(path));
            continue;
        }

        let mut data = Vec::with_capacity(file.size() as usize);
        if let Err(e) = file.read_to_end(&mut data) {
            debug!("skipping unreadable archive entry {}: {}", path, e);
            continue;
        }
        entries.push(ArchiveEntry::file(path, data));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("src/", FileOptions::default()).unwrap();
        for (name, data) in files {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_files_and_directories() {
        let bytes = build_zip(&[("src/zfoo.prog.abap", b"REPORT zfoo.")]);
        let entries = read_zip_entries(&bytes).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir);
        assert_eq!(entries[1].path, "src/zfoo.prog.abap");
        assert_eq!(entries[1].text().unwrap(), "REPORT zfoo.");
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        let err = read_zip_entries(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocGenError::Zip(_)));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("\u{feff}DATA x.".as_bytes()).unwrap(), "DATA x.");
        assert!(matches!(decode_text(&[0x00, 0xff, 0x00, 0x01]), Err(DocGenError::Decode(_))));
        assert!(decode_text(&[0xc3, 0x28]).unwrap_err().is_skippable());
    }
}
