use crate::error::{DocGenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "abapdocgen";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration struct for the application
///
/// Holds the root package label, output location, loader limits and the
/// path filters applied when walking input directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label of the root package node
    pub package_name: String,
    /// Directory where generated context files are written
    pub output_dir: PathBuf,
    /// Loader settings
    pub processing: ProcessingConfig,
    /// Extensions (without dot) that mark an upload as a documentation template
    pub template_extensions: Vec<String>,
    /// Regex patterns for paths to skip when walking directories
    pub excluded_files: Vec<String>,
}

/// Settings for the asynchronous content loader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Maximum number of file reads in flight for one upload batch
    pub max_concurrent_reads: usize,
}

impl Config {
    /// Creates a new configuration with the specified output directory
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            package_name: "Project".to_string(),
            output_dir,
            processing: ProcessingConfig::default(),
            template_extensions: vec!["docx".to_string(), "md".to_string(), "pdf".to_string()],
            excluded_files: vec![
                r"\.git/".to_string(),
                r"__MACOSX".to_string(),
                r"\.DS_Store".to_string(),
            ],
        }
    }

    /// Loads configuration from the default config file location
    ///
    /// Returns the default configuration when no file exists.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DocGenError::Config("Could not find config directory".into()))?;
        let config_path = config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Loads configuration from an explicit TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocGenError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the loader and tree builder cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.package_name.trim().is_empty() {
            return Err(DocGenError::Validation("package_name must not be empty".into()));
        }
        if self.processing.max_concurrent_reads == 0 {
            return Err(DocGenError::Validation(
                "processing.max_concurrent_reads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Creates the output directory if it is missing
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        if !tokio::fs::try_exists(&self.output_dir).await? {
            tokio::fs::create_dir_all(&self.output_dir).await?;
        }
        Ok(())
    }

    /// Checks if a path matches any of the configured exclusion patterns
    pub fn is_excluded_file(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excluded_files.iter().any(|pattern| {
            if let Ok(regex) = regex::Regex::new(pattern) {
                regex.is_match(&path_str)
            } else {
                false
            }
        })
    }

    /// Checks if a file name carries one of the template extensions
    pub fn is_template_name(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self
                .template_extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}
