//! Listing configuration.
//!
//! A [`ListingConfig`] decides which names are hidden from listings, which
//! file is pinned to the top of every listing, and what the generated listing
//! file is called. It is built once and passed by reference to the scanner
//! and the tree walker; nothing reads global state.
//!
//! ## Defaults
//!
//! ```text
//! Hidden names:  CNAME  node_modules  package.json  package-lock.json
//!                index.html  .git  .gitignore  .gitmodules  .nojekyll
//!                listing.html
//! VCS directory: .git      (any path with this component is skipped)
//! Pinned name:   aboutme.html
//! Listing file:  index.html
//! ```
//!
//! There is no config file. Tests and embedders derive alternate configs
//! from the default with the `with_*` / `without_*` builders.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

const DEFAULT_EXCLUDED: &[&str] = &[
    "CNAME",
    "node_modules",
    "package.json",
    "package-lock.json",
    "index.html",
    ".git",
    ".gitignore",
    ".gitmodules",
    ".nojekyll",
    "listing.html",
];

/// Immutable description of what a listing contains.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListingConfig {
    /// Literal file/directory names never listed and never descended into.
    pub excluded_names: BTreeSet<String>,
    /// Version-control metadata directory. A path with this component is
    /// excluded wherever it appears.
    pub vcs_dir: String,
    /// Entry always sorted first when present.
    pub pinned_name: String,
    /// Name of the generated listing file. Always excluded from listings.
    pub index_file: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            excluded_names: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            vcs_dir: ".git".to_string(),
            pinned_name: "aboutme.html".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

impl ListingConfig {
    /// Add names to the exclusion set.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Remove names from the exclusion set.
    ///
    /// The listing file and the VCS directory stay excluded regardless.
    pub fn without_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.excluded_names.remove(name.as_ref());
        }
        self
    }

    pub fn with_pinned(mut self, name: impl Into<String>) -> Self {
        self.pinned_name = name.into();
        self
    }

    /// Whether a child named `name` is dropped from its parent's listing.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        name == self.index_file || name == self.vcs_dir || self.excluded_names.contains(name)
    }

    /// Whether `dir` is neither listed nor descended into.
    ///
    /// True when its base name is excluded or when any component of the path
    /// is the VCS metadata directory.
    pub fn is_excluded_dir(&self, dir: &Path) -> bool {
        let base_excluded = dir
            .file_name()
            .map(|name| self.is_excluded_name(&name.to_string_lossy()))
            .unwrap_or(false);

        base_excluded
            || dir.components().any(|c| match c {
                Component::Normal(part) => part == self.vcs_dir.as_str(),
                _ => false,
            })
    }

    /// Validate that the single-name settings are plain file names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("index_file", &self.index_file),
            ("pinned_name", &self.pinned_name),
            ("vcs_dir", &self.vcs_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
            if value.contains('/') || value.contains(std::path::MAIN_SEPARATOR) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a file name, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}
