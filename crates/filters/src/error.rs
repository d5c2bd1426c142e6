use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Broad classification of a [`FilterError`].
///
/// Collaborators use this to pick an exit code without matching every
/// variant: syntax problems are usage errors, resource problems are I/O
/// errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterErrorKind {
    /// The rule text itself is malformed.
    Syntax,
    /// A merge file could not be read.
    Resource,
}

/// Error produced while parsing rule lines or loading merge files.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A rule line does not follow the filter grammar.
    #[error("failed to parse filter rule '{rule}'{}: {reason}", in_directory(.directory.as_deref()))]
    Syntax {
        /// The offending rule line.
        rule: String,
        /// Directory owning the scope that received the rule, if known.
        directory: Option<PathBuf>,
        /// Human readable description of the problem.
        reason: String,
    },
    /// A glob expression could not be compiled into a matcher.
    #[error("failed to compile filter pattern '{pattern}': {source}")]
    Pattern {
        /// The expression after anchoring and directory markers were applied.
        pattern: String,
        /// Underlying compilation failure.
        #[source]
        source: regex::Error,
    },
    /// A merge or dir-merge file exists but could not be read.
    #[error("impossible to parse filter file '{}' for {}: {source}", .path.display(), .directory.display())]
    Resource {
        /// Path of the filter file.
        path: PathBuf,
        /// Directory owning the scope that requested the file.
        directory: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A merge file includes itself, directly or through other merge files.
    #[error("recursive filter merge detected for '{}'", .path.display())]
    RecursiveMerge {
        /// The merge file that was reached a second time.
        path: PathBuf,
    },
}

impl FilterError {
    pub(crate) fn syntax(rule: &str, reason: impl Into<String>) -> Self {
        Self::Syntax {
            rule: rule.to_owned(),
            directory: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn resource(path: &Path, directory: &Path, source: io::Error) -> Self {
        Self::Resource {
            path: path.to_path_buf(),
            directory: directory.to_path_buf(),
            source,
        }
    }

    /// Attaches the owning directory to syntax errors that do not carry one yet.
    pub(crate) fn in_directory(self, dir: &Path) -> Self {
        match self {
            Self::Syntax {
                rule,
                directory: None,
                reason,
            } => Self::Syntax {
                rule,
                directory: Some(dir.to_path_buf()),
                reason,
            },
            other => other,
        }
    }

    /// Returns whether the error stems from rule syntax or from file access.
    #[must_use]
    pub const fn kind(&self) -> FilterErrorKind {
        match self {
            Self::Syntax { .. } | Self::Pattern { .. } => FilterErrorKind::Syntax,
            Self::Resource { .. } | Self::RecursiveMerge { .. } => FilterErrorKind::Resource,
        }
    }

    /// Returns the rule line for syntax errors.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::Syntax { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

fn in_directory(directory: Option<&Path>) -> String {
    directory.map_or_else(String::new, |dir| format!(" in {}", dir.display()))
}
