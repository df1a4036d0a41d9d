//! Shared types passed from the scanner to the renderer and the walker.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a directory listing.
///
/// Serializes to `{ "name", "size"?, "mtime", "type" }`; `size` is omitted
/// for directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// Display name. Directories carry a trailing `/`.
    pub name: String,
    /// Byte size, files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Timestamp the entry was sorted by. For directories this is the
    /// oldest child's mtime, see [`crate::scan::directory_timestamp`].
    pub mtime: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Filesystem path of the entry.
    #[serde(skip)]
    pub path: PathBuf,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Ordered entries of one directory. Order is the rendered order.
pub type Listing = Vec<DirectoryEntry>;
