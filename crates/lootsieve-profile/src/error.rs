//! Error types for lootsieve-profile

use thiserror::Error;

/// A single problem found while validating a profile document
///
/// The path pinpoints the offending field, e.g.
/// `affixes[0].boots.affix_pool[1].rules[2]`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    /// A name the catalog does not know
    #[error("{path}: unknown {kind} '{name}'")]
    UnresolvedName {
        path: String,
        kind: &'static str,
        name: String,
    },

    /// A scalar outside its allowed domain
    #[error("{path}: {message}")]
    OutOfRange { path: String, message: String },

    /// A cross-field contradiction
    #[error("{path}: {message}")]
    Invariant { path: String, message: String },
}

/// Profile loading error type
///
/// Wrong shapes and unknown fields surface as `Ron` parse errors; the
/// validator reports everything it found in one `Validation` error so the
/// author sees all problems at once.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("profile '{profile}' failed validation with {} issue(s)", .issues.len())]
    Validation {
        profile: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("duplicate profile name: {0}")]
    DuplicateProfile(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
