// Thu Oct 15 2026 - Alex

use crate::dump::{ExportError, ImageDump};
use log::info;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Byte buffer plus the metadata an export channel needs to hand it off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: guess_mime_type(file_name),
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = mime_type.to_string();
        self
    }

    /// Wraps a dump, naming it `<image file name>.dump` unless `file_name` is given.
    pub fn from_dump(dump: ImageDump, file_name: Option<&str>) -> Self {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => default_file_name(dump.image().file_name()),
        };
        Self::new(&name, dump.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn default_file_name(image_name: Option<&str>) -> String {
    format!("{}.dump", image_name.unwrap_or("image"))
}

fn guess_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    pub channel: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: u64,
    pub location: Option<PathBuf>,
}

/// Destination that takes ownership of an attachment and moves it out of
/// the process.
pub trait ExportChannel {
    fn name(&self) -> &str;
    fn deliver(&mut self, attachment: Attachment) -> Result<ExportReceipt, ExportError>;
}

/// Writes attachments as files into a directory.
pub struct FileExporter {
    dir: PathBuf,
    overwrite: bool,
}

impl FileExporter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target_path(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        let valid = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains('/')
            && !file_name.contains('\\')
            && !file_name.contains('\0');
        if !valid {
            return Err(ExportError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }
}

impl ExportChannel for FileExporter {
    fn name(&self) -> &str {
        "file"
    }

    fn deliver(&mut self, attachment: Attachment) -> Result<ExportReceipt, ExportError> {
        if attachment.is_empty() {
            return Err(ExportError::EmptyAttachment(attachment.file_name));
        }

        let path = self.target_path(&attachment.file_name)?;

        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&path).map_err(|e| io_error(&path, e))?;
        file.write_all(&attachment.bytes).map_err(|e| io_error(&path, e))?;
        file.flush().map_err(|e| io_error(&path, e))?;

        info!("wrote {} bytes to {}", attachment.len(), path.display());

        Ok(ExportReceipt {
            channel: self.name().to_string(),
            file_name: attachment.file_name,
            mime_type: attachment.mime_type,
            bytes: attachment.bytes.len() as u64,
            location: Some(path),
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    match source.kind() {
        ErrorKind::AlreadyExists => ExportError::AlreadyExists(path.to_path_buf()),
        ErrorKind::PermissionDenied => ExportError::PermissionDenied(path.to_path_buf()),
        _ => ExportError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Keeps delivered attachments in memory.
#[derive(Debug, Default)]
pub struct CollectingExporter {
    attachments: Vec<Attachment>,
}

impl CollectingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

impl ExportChannel for CollectingExporter {
    fn name(&self) -> &str {
        "memory"
    }

    fn deliver(&mut self, attachment: Attachment) -> Result<ExportReceipt, ExportError> {
        let receipt = ExportReceipt {
            channel: self.name().to_string(),
            file_name: attachment.file_name.clone(),
            mime_type: attachment.mime_type.clone(),
            bytes: attachment.bytes.len() as u64,
            location: None,
        };
        self.attachments.push(attachment);
        Ok(receipt)
    }
}
