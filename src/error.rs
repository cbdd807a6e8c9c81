use std::io;
use thiserror::Error;

/// Custom result type alias for the crate
pub type Result<T> = std::result::Result<T, DocGenError>;

/// Errors that can occur while loading, classifying or extracting ABAP objects
#[derive(Debug, Error)]
pub enum DocGenError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal errors
    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    /// Tag pattern compilation errors
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A file or archive entry could not be read as text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unknown item or tree node id
    #[error("Not found: {0}")]
    NotFound(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl DocGenError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error only affects the single file or entry that raised it
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::IO(_))
    }

    /// Checks if this error should abort the whole command
    pub fn is_fatal(&self) -> bool {
        !self.is_skippable()
    }
}
