// Thu Oct 15 2026 - Alex

use crate::dump::DEFAULT_CHUNK_SIZE;
use crate::image::ImageSelector;
use crate::symbol::parse_target;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process to inspect; `None` means the calling process.
    pub pid: Option<i32>,
    pub selector: ImageSelector,
    pub output_dir: PathBuf,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub overwrite: bool,
    pub strict: bool,
    pub chunk_size: usize,
    pub symbols_file: Option<PathBuf>,
    pub targets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pid: None,
            selector: ImageSelector::MainExecutable,
            output_dir: PathBuf::from("dumps"),
            file_name: None,
            mime_type: None,
            overwrite: false,
            strict: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            symbols_file: None,
            targets: Vec::new(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_selector(mut self, selector: ImageSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.targets.push(target.to_string());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn target_pid(&self) -> i32 {
        self.pid.unwrap_or_else(|| std::process::id() as i32)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
            }
        }

        fs::write(path, contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError("chunk_size must be greater than 0".to_string()));
        }
        if let Some(pid) = self.pid {
            if pid <= 0 {
                return Err(ConfigError::ValidationError(format!("invalid pid {}", pid)));
            }
        }
        if let Some(name) = &self.file_name {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::ValidationError(format!("invalid file_name '{}'", name)));
            }
        }
        for target in &self.targets {
            if parse_target(target).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "target '{}' is not of the form Class.method",
                    target
                )));
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
