//! Lootsieve Profile - RON profile loading, validation and the registry
//!
//! Turns profile documents into validated rule trees from lootsieve-core:
//! - `Loader` parses one RON document per profile and isolates failures
//! - `validate_profile` resolves names against the catalog and enforces
//!   the cross-field invariants
//! - `Registry` publishes the profiles in precedence order

mod error;
mod loader;
mod registry;
mod validate;

pub use error::{Error, Result, ValidationIssue};
pub use loader::{load_game_data, LoadFailure, Loader};
pub use registry::Registry;
pub use validate::validate_profile;
