//! # dir-index
//!
//! Generates a static `index.html` listing in every directory of a tree, for
//! file trees published as-is by a static web server.
//!
//! # Architecture: List, Render, Write
//!
//! ```text
//! 1. Scan      directory  →  Listing        (filtered, dated, sorted children)
//! 2. Render    Listing    →  HTML string    (maud, root-relative links)
//! 3. Generate  HTML       →  index.html     (no-cache headers, times kept, descend)
//! ```
//!
//! Each directory is handled on its own: its listing is computed, rendered,
//! written and dropped before the walker moves to the next directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Immutable exclusion set, pinned name and listing file name |
//! | [`scan`] | Lists one directory: filtering, directory dating, ordering |
//! | [`render`] | HTML document for one listing, no-cache header injection |
//! | [`generate`] | Depth-first tree walk writing one listing per directory |
//! | [`types`] | `DirectoryEntry` and `Listing`, shared by the stages |
//! | [`output`] | CLI output formatting for the walk and for single listings |
//!
//! # Design Decisions
//!
//! ## Newest First, Collections by First Content
//!
//! Entries sort newest first so a listing reads like a changelog. A
//! directory is dated by its **oldest** child: adding a file to an old
//! collection does not move the whole collection to the top. One pinned
//! name (`aboutme.html` by default) always comes first.
//!
//! ## Root-Relative Links
//!
//! Every link starts at `/`. Listings are written into the directories they
//! describe, and absolute paths keep them correct regardless of whether the
//! server adds a trailing slash to directory URLs.
//!
//! ## Listings Do Not Touch the Tree's Dates
//!
//! Rewriting a listing restores its previous access and modification times,
//! creating one restores its directory's times, and the listing file never
//! counts toward a directory's date. Running the
//! generator on an unchanged tree produces identical files with identical
//! times.
//!
//! ## Explicit Configuration
//!
//! Exclusions are a [`config::ListingConfig`] value handed to the scanner
//! and the walker. The binary uses the built-in defaults; tests build
//! variants with the `with_*` helpers.

pub mod config;
pub mod generate;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
