//! Directory scanning: one directory in, one ordered [`Listing`] out.
//!
//! ## Ordering
//!
//! ```text
//! site/
//! ├── aboutme.html     (2020)   → 1st, pinned regardless of age
//! ├── notes.txt        (2023)   → 2nd
//! ├── archive/         (2024)   → 3rd, sorted by its oldest child (2022)
//! │   └── old.txt      (2022)
//! └── index.html                → never listed
//! ```
//!
//! Files sort by their own mtime, newest first. A directory sorts by the
//! **oldest** mtime among its immediate children, so a collection keeps the
//! date it was first populated even when something inside it is touched
//! later. Ties fall back to file name order.
//!
//! ## Failures
//!
//! Failing to read the directory being listed is an error. Failing to read
//! one child (broken symlink, an entry that vanished mid-scan) skips that
//! child with a warning. Failing to read a child directory's contents only
//! changes how that directory is dated, see [`DirTimestamp`].
//!
//! ## Symlinks
//!
//! Symlinks are followed. A link that resolves to the listed directory or to
//! one of its ancestors is left out of the listing; a link to any other
//! directory is listed like a directory.

use crate::config::ListingConfig;
use crate::types::{DirectoryEntry, EntryKind, Listing};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot read directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// How a child directory's sort timestamp was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirTimestamp {
    /// Oldest mtime among the directory's own children.
    OldestChild(SystemTime),
    /// No children besides the listing file; the directory's own mtime.
    Empty(SystemTime),
    /// Contents could not be read; the directory's own mtime.
    Unreadable(SystemTime),
}

impl DirTimestamp {
    pub fn time(&self) -> SystemTime {
        match *self {
            DirTimestamp::OldestChild(t) | DirTimestamp::Empty(t) | DirTimestamp::Unreadable(t) => t,
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, DirTimestamp::OldestChild(_))
    }
}

/// A child that survived filtering, before it is turned into a row.
struct ScannedChild {
    path: PathBuf,
    file_name: String,
    kind: EntryKind,
    size: u64,
    sort_time: SystemTime,
}

impl ScannedChild {
    fn into_entry(self) -> DirectoryEntry {
        let (name, size) = match self.kind {
            EntryKind::Directory => (format!("{}/", self.file_name), None),
            EntryKind::File => (self.file_name, Some(self.size)),
        };
        DirectoryEntry {
            name,
            size,
            mtime: DateTime::<Utc>::from(self.sort_time),
            kind: self.kind,
            path: self.path,
        }
    }
}

/// List the immediate children of `dir`, filtered and sorted.
///
/// Returns an empty listing when `dir` itself is excluded.
pub fn list_directory(dir: &Path, config: &ListingConfig) -> Result<Listing, ScanError> {
    if config.is_excluded_dir(dir) {
        debug!("skipping excluded directory {}", dir.display());
        return Ok(Vec::new());
    }

    let ancestors = canonical_ancestors(dir);
    let mut children = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 is `dir` itself: nothing to list.
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) if err.loop_ancestor().is_some() => {
                debug!("leaving out link to an ancestor: {err}");
                continue;
            }
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if config.is_excluded_name(&file_name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(err) => {
                warn!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };

        if metadata.is_dir()
            && entry.path_is_symlink()
            && links_to_ancestor(entry.path(), &ancestors)
        {
            debug!("leaving out link to an ancestor: {}", entry.path().display());
            continue;
        }

        let child = if metadata.is_dir() {
            let stamp = directory_timestamp(entry.path(), modified, &config.index_file);
            ScannedChild {
                path: entry.into_path(),
                file_name,
                kind: EntryKind::Directory,
                size: 0,
                sort_time: stamp.time(),
            }
        } else {
            ScannedChild {
                path: entry.into_path(),
                file_name,
                kind: EntryKind::File,
                size: metadata.len(),
                sort_time: modified,
            }
        };
        children.push(child);
    }

    sort_children(&mut children, &config.pinned_name);
    Ok(children.into_iter().map(ScannedChild::into_entry).collect())
}

/// `dir` and every directory above it, resolved.
fn canonical_ancestors(dir: &Path) -> Vec<PathBuf> {
    match fs::canonicalize(dir) {
        Ok(canonical) => canonical.ancestors().map(Path::to_path_buf).collect(),
        Err(err) => {
            debug!("cannot resolve {} ({err})", dir.display());
            Vec::new()
        }
    }
}

fn links_to_ancestor(link: &Path, ancestors: &[PathBuf]) -> bool {
    fs::canonicalize(link)
        .map(|target| ancestors.contains(&target))
        .unwrap_or(false)
}

/// Date a child directory by its oldest immediate child.
///
/// `own_mtime` is used when the directory has nothing but `index_file` in it,
/// or when its contents cannot be read.
pub fn directory_timestamp(dir: &Path, own_mtime: SystemTime, index_file: &str) -> DirTimestamp {
    match oldest_child_mtime(dir, index_file) {
        Ok(Some(oldest)) => DirTimestamp::OldestChild(oldest),
        Ok(None) => DirTimestamp::Empty(own_mtime),
        Err(err) => {
            debug!(
                "cannot read {} ({err}), dating it by its own mtime",
                dir.display()
            );
            DirTimestamp::Unreadable(own_mtime)
        }
    }
}

fn oldest_child_mtime(dir: &Path, index_file: &str) -> io::Result<Option<SystemTime>> {
    let mut oldest: Option<SystemTime> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == index_file {
            continue;
        }
        let modified = fs::metadata(entry.path())?.modified()?;
        oldest = Some(oldest.map_or(modified, |t| t.min(modified)));
    }
    Ok(oldest)
}

fn sort_children(children: &mut [ScannedChild], pinned: &str) {
    children.sort_by(|a, b| {
        match (a.file_name == pinned, b.file_name == pinned) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        b.sort_time
            .cmp(&a.sort_time)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}
