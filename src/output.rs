//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Generating listing for: /srv/site
//! Creating index at: /srv/site/index.html (3 entries)
//! Generating listing for: /srv/site/archive
//! Creating index at: /srv/site/archive/index.html (1 entry, timestamps kept)
//! Skipping /srv/site/pictures (already listed)
//!
//! Generated 2 listings under /srv/site
//! ```
//!
//! ## Scan
//!
//! ```text
//! Index of archive
//!     aboutme.html   2020-09-13 12:26   1.2 KB
//!     notes.txt      2023-11-14 22:13    312 B
//!     photos/        2022-04-15 05:20        -
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Warnings are not formatted
//! here; the library logs them through `tracing`.

use crate::generate::{GenerateEvent, GenerateReport};
use crate::render::format_size;
use crate::types::Listing;
use std::path::Path;

fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Lines for one walker event.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::Listing { dir } => {
            vec![format!("Generating listing for: {}", dir.display())]
        }
        GenerateEvent::Wrote {
            path,
            entries,
            preserved,
        } => {
            let kept = if *preserved { ", timestamps kept" } else { "" };
            vec![format!(
                "Creating index at: {} ({}{kept})",
                path.display(),
                count(*entries, "entry", "entries")
            )]
        }
        // Already logged as a warning by the walker.
        GenerateEvent::PreserveFailed { .. } => Vec::new(),
        GenerateEvent::SkippedVisited { dir } => {
            vec![format!("Skipping {} (already listed)", dir.display())]
        }
    }
}

pub fn print_generate_event(event: &GenerateEvent) {
    for line in format_generate_event(event) {
        println!("{}", line);
    }
}

/// Closing summary of a run.
pub fn format_generate_summary(report: &GenerateReport, root: &Path) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Generated {} under {}",
            count(report.written, "listing", "listings"),
            root.display()
        ),
    ];
    if !report.preserve_failures.is_empty() {
        lines.push(format!(
            "Could not keep timestamps of {}",
            count(report.preserve_failures.len(), "listing", "listings")
        ));
    }
    if !report.skipped.is_empty() {
        lines.push(format!(
            "Skipped {} reached twice through symlinks",
            count(report.skipped.len(), "directory", "directories")
        ));
    }
    lines
}

pub fn print_generate_summary(report: &GenerateReport, root: &Path) {
    for line in format_generate_summary(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Aligned text view of one listing.
pub fn format_scan_output(listing: &Listing, title: &str) -> Vec<String> {
    let mut lines = vec![format!("Index of {}", title)];
    if listing.is_empty() {
        lines.push("    (empty)".to_string());
        return lines;
    }

    let rows: Vec<(String, String, String)> = listing
        .iter()
        .map(|entry| {
            (
                entry.name.clone(),
                entry.mtime.format("%Y-%m-%d %H:%M").to_string(),
                entry.size.map(format_size).unwrap_or_else(|| "-".to_string()),
            )
        })
        .collect();
    let name_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
    let size_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(0);

    for (name, modified, size) in rows {
        lines.push(format!(
            "    {:<name_width$}   {}   {:>size_width$}",
            name, modified, size
        ));
    }
    lines
}

pub fn print_scan_output(listing: &Listing, title: &str) {
    for line in format_scan_output(listing, title) {
        println!("{}", line);
    }
}
