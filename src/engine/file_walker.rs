//! Discovery of Apache configuration files
//!
//! Walks directories with gitignore support and keeps files matching the
//! include globs but none of the exclude globs. Globs are matched against
//! the path relative to the walk root.

use crate::types::GlobPattern;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur during file walking
#[derive(Debug, Error)]
pub enum FileWalkerError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Reason why a file was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// File did not match the include patterns
    NotIncluded,
    /// File matched an exclude pattern
    Excluded,
}

/// Include/exclude filter applied to walked paths
struct PathFilter {
    root: PathBuf,
    include_set: Option<GlobSet>,
    exclude_set: GlobSet,
}

impl PathFilter {
    fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        if let Some(ref include_set) = self.include_set
            && !include_set.is_match(relative)
        {
            return Some(SkipReason::NotIncluded);
        }

        if self.exclude_set.is_match(relative) {
            return Some(SkipReason::Excluded);
        }

        None
    }
}

/// Walker over the configuration files below a root directory
pub struct FileWalker {
    walker: ignore::Walk,
    filter: PathFilter,
}

impl FileWalker {
    /// Creates a new FileWalker
    ///
    /// # Arguments
    /// * `root` - Root directory to walk
    /// * `include` - Include patterns (empty means include all)
    /// * `exclude` - Exclude patterns (applied after include)
    pub fn new(
        root: &Path,
        include: &[GlobPattern],
        exclude: &[GlobPattern],
    ) -> Result<Self, FileWalkerError> {
        let walker = WalkBuilder::new(root)
            .hidden(false) // .htaccess files are hidden
            .git_ignore(true)
            .build();

        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };

        // Always exclude .git directory, merging with user-provided excludes
        let mut exclude_patterns = Vec::from(exclude);
        exclude_patterns.push(GlobPattern::new("**/.git/**"));
        let exclude_set = build_globset(&exclude_patterns)?;

        Ok(Self {
            walker,
            filter: PathFilter {
                root: root.to_path_buf(),
                include_set,
                exclude_set,
            },
        })
    }

    /// Returns why `path` would be skipped, or None if it would be scanned
    pub fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        self.filter.skip_reason(path)
    }

    /// Walks the directory tree and returns an iterator over matching files
    pub fn walk(self) -> impl Iterator<Item = Result<PathBuf, FileWalkerError>> {
        let filter = self.filter;

        self.walker.filter_map(move |result| match result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    return None;
                }

                let path = entry.path();
                if let Some(reason) = filter.skip_reason(path) {
                    trace!(path = %path.display(), ?reason, "skipping file");
                    return None;
                }

                Some(Ok(path.to_path_buf()))
            }
            Err(e) => Some(Err(FileWalkerError::Walk(e))),
        })
    }
}

/// Builds a GlobSet from patterns
fn build_globset(patterns: &[GlobPattern]) -> Result<GlobSet, FileWalkerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| FileWalkerError::InvalidGlob {
            pattern: pattern.as_str().to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| FileWalkerError::InvalidGlob {
        pattern: "<globset>".to_string(),
        source: e,
    })
}
