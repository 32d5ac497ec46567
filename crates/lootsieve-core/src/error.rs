//! Error types for lootsieve-core

use thiserror::Error;

/// Evaluation error type
///
/// Only malformed item snapshots produce errors; over well-formed input
/// evaluation is total. The resolver degrades any of these to "no match"
/// so a single unreadable item never aborts a filter pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("item power could not be read but the rule requires at least {required}")]
    MissingPower { required: u32 },

    #[error("item carries no sigil details")]
    MissingSigil,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
