//! Unified error type for the domain layer.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Cursor index outside the date axis. Never clamped here: UI-facing
    /// callers clamp before calling, so a rejection means a buggy caller.
    #[error("Cursor index {index} out of range for axis of {len} dates")]
    CursorOutOfRange { index: usize, len: usize },

    /// A feature in one of the source files is missing required properties.
    #[error("Invalid feature: {0}")]
    Feature(String),
}

impl DomainError {
    /// Create an invalid-feature error.
    pub fn feature(msg: impl Into<String>) -> Self {
        Self::Feature(msg.into())
    }
}
