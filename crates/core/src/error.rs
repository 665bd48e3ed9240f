//! Domain error model.

use thiserror::Error;

/// Errors raised by the building blocks in this crate.
///
/// Bounded contexts (e.g. shipping) define their own, more specific taxonomies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
