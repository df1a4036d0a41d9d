//! Tree walking and listing generation.
//!
//! Walks the tree depth-first from the root, writing one listing file into
//! every directory that is not excluded:
//!
//! ```text
//! site/                    →  site/index.html            "Index of /"
//! ├── archive/             →  site/archive/index.html    "Index of archive"
//! │   └── 2023/            →  site/archive/2023/index.html
//! ├── .git/                    (never visited)
//! └── node_modules/            (never visited)
//! ```
//!
//! Children are visited in listing order. The traversal uses an explicit
//! stack, so tree depth does not grow the call stack.
//!
//! ## Timestamp Preservation
//!
//! A regenerated listing file keeps the access and modification times it had
//! before, and a newly created one leaves its directory's times as they were,
//! so a rebuild does not register as a change to the tree. Failing to
//! restore the times is logged, reported as [`GenerateEvent::PreserveFailed`],
//! and the walk continues.
//!
//! ## Symlinks
//!
//! Directories are identified by their canonical path. A directory reached a
//! second time (through a symlink) is skipped, which also breaks cycles.

use crate::config::ListingConfig;
use crate::render::{self, RenderOptions};
use crate::scan::{self, ScanError};
use filetime::FileTime;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Cannot resolve {}: {source}", path.display())]
    Resolve { path: PathBuf, source: io::Error },
}

/// Progress reported while walking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateEvent {
    /// About to list `dir`.
    Listing { dir: PathBuf },
    /// Wrote the listing file.
    Wrote { path: PathBuf, entries: usize, preserved: bool },
    /// Wrote the listing file but could not restore its previous times.
    PreserveFailed { path: PathBuf, reason: String },
    /// `dir` resolves to a directory that was already listed.
    SkippedVisited { dir: PathBuf },
}

/// Totals for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Listing files written.
    pub written: usize,
    /// Of those, files whose previous times were restored.
    pub preserved: usize,
    pub preserve_failures: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Outcome of restoring a rewritten file's times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preservation {
    /// No file existed before; the containing directory's times were kept.
    NewFile,
    Preserved,
    Failed(String),
}

/// Generate a listing file in `root` and every non-excluded directory below.
///
/// `on_event` sees every step as it happens, in order.
pub fn generate<F>(
    root: &Path,
    config: &ListingConfig,
    mut on_event: F,
) -> Result<GenerateReport, GenerateError>
where
    F: FnMut(&GenerateEvent),
{
    let options = RenderOptions {
        filter: false,
        root: "/".to_string(),
    };
    let mut report = GenerateReport::default();
    let mut visited = HashSet::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let canonical = fs::canonicalize(&dir).map_err(|source| GenerateError::Resolve {
            path: dir.clone(),
            source,
        })?;
        if !visited.insert(canonical) {
            debug!("{} was already listed, skipping", dir.display());
            on_event(&GenerateEvent::SkippedVisited { dir: dir.clone() });
            report.skipped.push(dir);
            continue;
        }

        on_event(&GenerateEvent::Listing { dir: dir.clone() });
        let listing = scan::list_directory(&dir, config)?;

        let title = display_title(root, &dir);
        let html = render::inject_no_cache_headers(&render::render(&title, &listing, &options));

        let index_path = dir.join(&config.index_file);
        let preservation = write_preserving_times(&index_path, &html)?;
        record_write(&mut report, &mut on_event, index_path, listing.len(), preservation);

        // Reversed so the first listed directory is popped first.
        for entry in listing.iter().rev().filter(|e| e.is_dir()) {
            if config.is_excluded_dir(&entry.path) {
                debug!("not descending into {}", entry.path.display());
                continue;
            }
            stack.push(entry.path.clone());
        }
    }

    Ok(report)
}

/// Count one written listing file and report it.
fn record_write<F>(
    report: &mut GenerateReport,
    on_event: &mut F,
    path: PathBuf,
    entries: usize,
    preservation: Preservation,
) where
    F: FnMut(&GenerateEvent),
{
    report.written += 1;
    match &preservation {
        Preservation::Preserved => report.preserved += 1,
        Preservation::Failed(reason) => {
            on_event(&GenerateEvent::PreserveFailed {
                path: path.clone(),
                reason: reason.clone(),
            });
            report.preserve_failures.push(path.clone());
        }
        Preservation::NewFile => {}
    }
    on_event(&GenerateEvent::Wrote {
        path,
        entries,
        preserved: preservation == Preservation::Preserved,
    });
}

/// Title for `dir`: its path below `root` with `/` separators, or `/` for
/// the root itself.
pub fn display_title(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        "/".to_string()
    } else {
        parts.join("/")
    }
}

/// Write `contents` to `path` without changing the dates the tree reports.
///
/// Replacing a file restores that file's access and modification times.
/// Creating one restores the times of the directory it was created in,
/// since that directory's own mtime can date it in its parent's listing.
pub fn write_preserving_times(path: &Path, contents: &str) -> Result<Preservation, GenerateError> {
    let previous = current_times(path);
    let parent_times = match (&previous, path.parent()) {
        (None, Some(parent)) => current_times(parent).map(|times| (parent, times)),
        _ => None,
    };

    fs::write(path, contents).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some((atime, mtime)) = previous {
        return Ok(restore_times(path, atime, mtime));
    }
    match parent_times.map(|(parent, (atime, mtime))| restore_times(parent, atime, mtime)) {
        Some(Preservation::Failed(reason)) => Ok(Preservation::Failed(reason)),
        _ => Ok(Preservation::NewFile),
    }
}

/// Reapply `atime` and `mtime` to `path`. Failure is logged, not returned.
pub fn restore_times(path: &Path, atime: FileTime, mtime: FileTime) -> Preservation {
    match filetime::set_file_times(path, atime, mtime) {
        Ok(()) => Preservation::Preserved,
        Err(err) => {
            warn!("Could not preserve timestamps for {}: {err}", path.display());
            Preservation::Failed(err.to_string())
        }
    }
}

fn current_times(path: &Path) -> Option<(FileTime, FileTime)> {
    match fs::metadata(path) {
        Ok(meta) => Some((
            FileTime::from_last_access_time(&meta),
            FileTime::from_last_modification_time(&meta),
        )),
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                debug!("cannot stat {} ({err}), not preserving times", path.display());
            }
            None
        }
    }
}
