//! HTML rendering of a single listing.
//!
//! [`render`] turns `(title, entries, options)` into a complete HTML
//! document. It knows nothing about the filesystem: the walker decides what
//! goes in a listing, the renderer only decides how it looks.
//!
//! ## Document Shape
//!
//! ```text
//! Index of archive/2023
//!
//! Name            Last modified       Size
//! ../
//! aboutme.html    2020-09-13 12:26    1.2 KB
//! photos/         2022-04-15 05:20    -
//! ```
//!
//! ## Links
//!
//! Links are root-relative (`/archive/2023/photos/`), built from
//! [`RenderOptions::root`] and the title, so a listing keeps working when it
//! is served from any depth. Every path segment is percent-encoded.
//!
//! ## Caching
//!
//! Listings change whenever the tree changes, so the walker runs the rendered
//! document through [`inject_no_cache_headers`] before writing it.

use crate::types::DirectoryEntry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fmt::Write;

const CSS: &str = include_str!("../static/listing.css");

/// Meta tags placed right after `<head>` so clients always refetch.
pub const NO_CACHE_META: [&str; 3] = [
    r#"<meta http-equiv="Cache-Control" content="no-cache, no-store, must-revalidate">"#,
    r#"<meta http-equiv="Pragma" content="no-cache">"#,
    r#"<meta http-equiv="Expires" content="0">"#,
];

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Hide dot-entries. The walker turns this off: its listings are
    /// already filtered.
    pub filter: bool,
    /// Prefix for every link.
    pub root: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filter: true,
            root: "/".to_string(),
        }
    }
}

/// Render a listing titled `title` (`/` for the tree root, otherwise the
/// directory path relative to it).
pub fn render(title: &str, entries: &[DirectoryEntry], options: &RenderOptions) -> String {
    let rel = if title == "/" { "" } else { title };
    let base = directory_href(&options.root, rel);
    let parent = (!rel.is_empty()).then(|| {
        let parent_rel = rel.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("");
        directory_href(&options.root, parent_rel)
    });

    let visible = entries
        .iter()
        .filter(|e| !options.filter || !e.name.starts_with('.'));

    let content = html! {
        h1 { "Index of " (title) }
        table {
            thead {
                tr {
                    th { "Name" }
                    th { "Last modified" }
                    th.size { "Size" }
                }
            }
            tbody {
                @if let Some(parent) = &parent {
                    tr {
                        td { a href=(parent) { "../" } }
                        td {}
                        td.size { "-" }
                    }
                }
                @for entry in visible {
                    (entry_row(entry, &base))
                }
            }
        }
    };

    base_document(&format!("Index of {title}"), content).into_string()
}

/// Insert [`NO_CACHE_META`] after the first `<head>`.
///
/// Documents without a `<head>` are returned unchanged.
pub fn inject_no_cache_headers(html: &str) -> String {
    let tags: String = NO_CACHE_META.iter().map(|tag| format!("\n  {tag}")).collect();
    html.replacen("<head>", &format!("<head>{tags}"), 1)
}

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn entry_row(entry: &DirectoryEntry, base: &str) -> Markup {
    let stem = entry.name.strip_suffix('/').unwrap_or(&entry.name);
    let mut href = format!("{base}{}", encode_segment(stem));
    if entry.is_dir() {
        href.push('/');
    }
    let size = entry.size.map(format_size).unwrap_or_else(|| "-".to_string());
    let modified = entry.mtime.format("%Y-%m-%d %H:%M").to_string();

    html! {
        tr {
            td { a href=(href) { (entry.name) } }
            td { (modified) }
            td.size { (size) }
        }
    }
}

/// `root` + each segment of `rel`, with a trailing slash.
fn directory_href(root: &str, rel: &str) -> String {
    let mut href = root.trim_end_matches('/').to_string();
    for segment in rel.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.push_str(&encode_segment(segment));
    }
    href.push('/');
    href
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `3.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
