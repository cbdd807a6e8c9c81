//! Asynchronous content loading for files and archives.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::archive::{self, decode_text_file, is_zip_file, ArchiveParseResult};
use crate::config::Config;
use crate::error::{DocGenError, Result};
use crate::model::{FileCategory, ItemId};
use crate::parallel::ParallelProcessor;
use crate::workspace::Workspace;

/// Outcome of one upload batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Items whose content was applied
    pub loaded: usize,
    /// Items removed because their content could not be read as text
    pub skipped: usize,
}

/// Input paths split by how they are loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFiles {
    /// Plain files, one item each
    pub files: Vec<PathBuf>,
    /// ZIP archives
    pub archives: Vec<PathBuf>,
}

/// Expands directories and separates archives from plain files.
///
/// Directory contents are visited in file-name order and filtered through
/// [`Config::is_excluded_file`]. Explicitly named files are taken as given.
pub fn collect_input_files(paths: &[PathBuf], config: &Config) -> Result<InputFiles> {
    let mut input = InputFiles::default();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !config.is_excluded_file(e.path()))
            {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => push_input(&mut input, entry.into_path()),
                    Ok(_) => {}
                    Err(e) => {
                        let path_str = e
                            .path()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "unknown path".to_string());
                        warn!("cannot walk {}: {}", path_str, e);
                    }
                }
            }
        } else if path.is_file() {
            push_input(&mut input, path.clone());
        } else {
            return Err(DocGenError::NotFound(path.display().to_string()));
        }
    }

    debug!(
        "collected {} file(s) and {} archive(s)",
        input.files.len(),
        input.archives.len()
    );
    Ok(input)
}

fn push_input(input: &mut InputFiles, path: PathBuf) {
    if is_zip_file(&display_name(&path)) {
        input.archives.push(path);
    } else {
        input.files.push(path);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Adds one item per file and loads all contents concurrently.
///
/// Every file is registered as a pending item first, in batch order. Reads
/// then run on a pool bounded by `processing.max_concurrent_reads` and each
/// result is applied by item id. Files that cannot be read as text are
/// removed again instead of being left without content.
pub async fn load_paths(workspace: &mut Workspace, paths: &[PathBuf], config: &Config) -> Result<LoadReport> {
    let mut pending: Vec<(ItemId, PathBuf)> = Vec::with_capacity(paths.len());
    for path in paths {
        let name = display_name(path);
        let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
        let category = if config.is_template_name(&name) {
            FileCategory::Template
        } else {
            FileCategory::MainLogic
        };
        let id = workspace.add_pending(name, size, category);
        pending.push((id, path.clone()));
    }

    let processor = ParallelProcessor::new(config.processing.max_concurrent_reads);
    let tasks: Vec<_> = pending
        .iter()
        .map(|(_, path)| {
            let path = path.clone();
            async move { decode_text_file(&path).await }
        })
        .collect();
    let results = processor.process(tasks).await;

    let mut report = LoadReport::default();
    for ((id, path), result) in pending.into_iter().zip(results) {
        match result {
            Ok(content) => {
                if workspace.apply_content(&id, content) {
                    report.loaded += 1;
                }
            }
            Err(e) => {
                if e.is_skippable() {
                    debug!("skipping {}: {}", path.display(), e);
                } else {
                    warn!("failed to load {}: {}", path.display(), e);
                }
                workspace.remove(&id);
                report.skipped += 1;
            }
        }
    }

    info!(
        "upload batch: {} loaded, {} skipped, {} item(s) in workspace",
        report.loaded,
        report.skipped,
        workspace.len()
    );
    Ok(report)
}

/// Reads an archive from disk and extracts its objects.
///
/// Decompression and grouping run on a blocking worker thread.
pub async fn load_archive(path: &Path) -> Result<ArchiveParseResult> {
    let bytes = tokio::fs::read(path).await?;
    let name = display_name(path);
    let result = tokio::task::spawn_blocking(move || archive::parse_archive(&bytes))
        .await
        .map_err(|e| DocGenError::Message(format!("archive worker failed: {}", e)))??;
    info!(
        "loaded archive {}: {} file(s), {} object(s)",
        name,
        result.stats.total_files,
        result.objects.len()
    );
    Ok(result)
}
