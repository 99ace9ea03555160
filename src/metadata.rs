//! Point-in-time description of a URI-addressed local file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::{detect_from_path, DetectionResult};
use crate::error::Result;
use crate::mode::Mode;
use crate::uri::Uri;

/// What the path of a URI currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, fifos, devices.
    Other,
}

/// A snapshot taken by [`LocalFile::metadata`](crate::LocalFile::metadata).
///
/// Naming fields come from the URI, everything else from the filesystem at
/// the time of the call. Nothing is refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub uri: String,
    pub path: String,
    pub directory: String,
    /// `None` when the path ends with a separator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// The mode the handle was created with, not the file's permissions.
    pub mode: Mode,
    pub kind: EntryKind,
    /// Length in bytes as reported by the filesystem.
    pub len: u64,
    pub readonly: bool,
    /// Only detected for regular files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Unset on filesystems without birth times.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Stat the path of `uri`. Fails with the platform error if it is gone.
    pub fn collect(uri: &Uri, mode: &Mode) -> Result<Self> {
        let fs_meta = fs::metadata(uri.path())?;
        let file_type = fs_meta.file_type();
        let kind = if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        };

        let detection = match kind {
            EntryKind::File => detect_from_path(Path::new(uri.path()))?,
            _ => DetectionResult::default(),
        };

        let filename = uri.filename();
        Ok(Self {
            uri: uri.to_string(),
            path: uri.path().to_string(),
            directory: uri.directory().to_string(),
            filename: (!filename.is_empty()).then(|| filename.to_string()),
            mode: mode.clone(),
            kind,
            len: fs_meta.len(),
            readonly: fs_meta.permissions().readonly(),
            mime_type: detection.mime_type,
            extension: detection.extension,
            modified: fs_meta.modified().ok().map(DateTime::<Utc>::from),
            created: fs_meta.created().ok().map(DateTime::<Utc>::from),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns a compact JSON representation.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
