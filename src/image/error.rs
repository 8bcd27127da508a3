// Thu Oct 15 2026 - Alex

use crate::image::ImageSelector;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Image table unavailable: {0}")]
    TableUnavailable(String),
    #[error("Permission denied reading image table of process {0}")]
    PermissionDenied(i32),
    #[error("Process {0} not found")]
    ProcessNotFound(i32),
    #[error("Image table is empty")]
    EmptyTable,
    #[error("No image matches selector '{0}'")]
    NoMatch(ImageSelector),
    #[error("Image {0} reports a null base address")]
    NullBase(PathBuf),
    #[error("Main executable path is unknown for this image table")]
    MainExecutableUnknown,
    #[error("Invalid image selector '{0}': {1}")]
    InvalidSelector(String, String),
}
