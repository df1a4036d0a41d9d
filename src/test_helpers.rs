//! Shared test utilities for the dir-index test suite.
//!
//! Builds small directory trees in a temp dir with explicit modification
//! times, since listing order depends on them.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "notes.txt", "hello", T2);
//! write_file(tmp.path(), "archive/old.txt", "old", T1);
//!
//! let listing = list_directory(tmp.path(), &ListingConfig::default()).unwrap();
//! assert_eq!(entry_names(&listing), vec!["notes.txt", "archive/"]);
//! ```

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{DirectoryEntry, Listing};

pub use tempfile::TempDir;

// Fixed epoch seconds, increasing. Far enough apart that filesystem
// timestamp granularity never reorders them.
pub const T0: i64 = 1_600_000_000;
pub const T1: i64 = 1_650_000_000;
pub const T2: i64 = 1_700_000_000;
pub const T3: i64 = 1_720_000_000;

// =========================================================================
// Tree setup
// =========================================================================

/// Write `contents` to `root/rel` (creating parents) and set its mtime.
pub fn write_file(root: &Path, rel: &str, contents: &str, mtime: i64) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    set_mtime(&path, mtime);
    path
}

/// Create `root/rel` and all missing parents.
pub fn make_dir(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(&path).unwrap();
    path
}

pub fn set_mtime(path: &Path, secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

pub fn set_times(path: &Path, atime: i64, mtime: i64) {
    filetime::set_file_times(
        path,
        FileTime::from_unix_time(atime, 0),
        FileTime::from_unix_time(mtime, 0),
    )
    .unwrap();
}

/// (atime, mtime) of `path` in whole seconds.
pub fn file_times(path: &Path) -> (i64, i64) {
    let meta = fs::metadata(path).unwrap();
    (
        FileTime::from_last_access_time(&meta).unix_seconds(),
        FileTime::from_last_modification_time(&meta).unix_seconds(),
    )
}

// =========================================================================
// Listing extractors
// =========================================================================

/// Entry names in listing order.
pub fn entry_names(listing: &Listing) -> Vec<&str> {
    listing.iter().map(|e| e.name.as_str()).collect()
}

/// Find an entry by display name. Panics if not found.
pub fn find_entry<'a>(listing: &'a Listing, name: &str) -> &'a DirectoryEntry {
    listing.iter().find(|e| e.name == name).unwrap_or_else(|| {
        let names = entry_names(listing);
        panic!("entry '{name}' not found. Available: {names:?}")
    })
}
