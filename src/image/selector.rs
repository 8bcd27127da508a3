// Thu Oct 15 2026 - Alex

use crate::image::{ImageRecord, LocateError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Criterion used to pick one image out of an image table.
///
/// String forms: `first`, `main`, `path:<abs path>`, `name:<file name>`,
/// `contains:<substring>`, `regex:<pattern>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageSelector {
    First,
    MainExecutable,
    Path(PathBuf),
    FileName(String),
    PathContains(String),
    Pattern(Regex),
}

impl ImageSelector {
    /// Whether `image` satisfies this criterion. `First` and `MainExecutable`
    /// depend on the table and are decided by the locator.
    pub fn matches(&self, image: &ImageRecord, main_executable: Option<&Path>) -> bool {
        match self {
            ImageSelector::First => false,
            ImageSelector::MainExecutable => main_executable == Some(image.path()),
            ImageSelector::Path(path) => image.path() == path.as_path(),
            ImageSelector::FileName(name) => image.file_name() == Some(name.as_str()),
            ImageSelector::PathContains(needle) => {
                image.path().to_string_lossy().contains(needle.as_str())
            }
            ImageSelector::Pattern(re) => re.is_match(&image.path().to_string_lossy()),
        }
    }
}

impl Default for ImageSelector {
    fn default() -> Self {
        ImageSelector::MainExecutable
    }
}

impl FromStr for ImageSelector {
    type Err = LocateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "first" => return Ok(ImageSelector::First),
            "main" => return Ok(ImageSelector::MainExecutable),
            _ => {}
        }

        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| LocateError::InvalidSelector(s.to_string(), "unknown selector kind".to_string()))?;

        if value.is_empty() {
            return Err(LocateError::InvalidSelector(s.to_string(), "empty value".to_string()));
        }

        match kind {
            "path" => Ok(ImageSelector::Path(PathBuf::from(value))),
            "name" => Ok(ImageSelector::FileName(value.to_string())),
            "contains" => Ok(ImageSelector::PathContains(value.to_string())),
            "regex" => Regex::new(value)
                .map(ImageSelector::Pattern)
                .map_err(|e| LocateError::InvalidSelector(s.to_string(), e.to_string())),
            other => Err(LocateError::InvalidSelector(
                s.to_string(),
                format!("unknown selector kind '{}'", other),
            )),
        }
    }
}

impl TryFrom<String> for ImageSelector {
    type Error = LocateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSelector> for String {
    fn from(selector: ImageSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for ImageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSelector::First => write!(f, "first"),
            ImageSelector::MainExecutable => write!(f, "main"),
            ImageSelector::Path(path) => write!(f, "path:{}", path.display()),
            ImageSelector::FileName(name) => write!(f, "name:{}", name),
            ImageSelector::PathContains(needle) => write!(f, "contains:{}", needle),
            ImageSelector::Pattern(re) => write!(f, "regex:{}", re.as_str()),
        }
    }
}
