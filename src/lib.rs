#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! abapdocgen - ABAP object navigator and documentation context builder
//!
//! This library turns uploaded ABAP sources and abapGit exports into an
//! SE80-style object tree and into Markdown context for documentation
//! requests.
//!
//! ## Features
//! - Classify files by SAP naming conventions, refined by their content
//! - Parse REPORT, FUNCTION, FORM and MODULE blocks from source text
//! - Build a deterministic object tree with stable node ids
//! - Extract table, data element, function group and class metadata from abapGit archives
//! - Assemble request payloads for any subtree
//!
//! ## Usage
//! ```rust,ignore
//! use abapdocgen::{Config, Workspace, loader};
//! use std::path::PathBuf;
//!
//! async fn example() -> abapdocgen::Result<()> {
//!     let config = Config::default();
//!     let mut workspace = Workspace::new(&config.package_name);
//!     let input = loader::collect_input_files(&[PathBuf::from("src")], &config)?;
//!     loader::load_paths(&mut workspace, &input.files, &config).await?;
//!
//!     let tree = workspace.build_tree();
//!     println!("{}", abapdocgen::render::render_tree(&tree, &Default::default()));
//!     Ok(())
//! }
//! ```

/// abapGit archive reading, grouping and metadata extraction
pub mod archive;
/// Object classification by file name and content
pub mod classifier;
/// Configuration module for the application
pub mod config;
/// Request payload assembly
pub mod context;
/// Error handling types and utilities
pub mod error;
/// Asynchronous file and archive loading
pub mod loader;
/// Logging configuration and utilities
pub mod logging;
/// Uploaded items and categories
pub mod model;
/// Parallel processing utilities
pub mod parallel;
/// Line-based ABAP source parser
pub mod parser;
/// Text rendering of the object tree
pub mod render;
/// Object tree construction and queries
pub mod tree;
/// Utilities (path normalization)
pub mod utils;
/// Session item collection
pub mod workspace;

// Re-export common types
pub use archive::{build_metadata_context, is_zip_file, ArchiveParseResult, ExtractedObject, ObjectType};
pub use classifier::{classify_filename, classify_item, refine_with_content, Classification, DetectedType};
pub use config::Config;
pub use context::RequestContext;
pub use error::{DocGenError, Result};
pub use model::{FileCategory, ItemId, UploadedItem};
pub use parser::{parse_abap_content, ParsedContent};
pub use tree::{build_tree, reachable_item_ids, scope_label, ExpansionState, NodeKind, TreeNode};
pub use workspace::Workspace;
