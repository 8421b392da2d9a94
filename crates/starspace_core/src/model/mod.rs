//! Wire and form models for the compatibility backend.
//!
//! # Responsibility
//! - Define the records exchanged with the remote API.
//! - Define form drafts with local validation rules.
//!
//! # Invariants
//! - Read models mirror backend JSON (snake_case field names).
//! - Drafts are validated before any payload reaches the network layer.

pub mod compatibility;
pub mod friend;
pub mod personality;
pub mod profile;
pub mod user;

use thiserror::Error;

/// Local form validation failure. Never produced by the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
