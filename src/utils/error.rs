//! Error handling for the access engine
//!
//! This module defines all error types returned by the engine's mutation
//! surface. The read path (permission checks) never returns errors: missing
//! or inconsistent data degrades to a deny and is logged as a
//! data-integrity warning instead.

use thiserror::Error;

/// Result type alias for the access engine
pub type Result<T> = std::result::Result<T, AccessError>;

/// Main error type for the access engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Invalid input: unknown permission or role reference, malformed
    /// regular expression, selector outside a team's defining project
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempted mutation of a built-in role outside reconciliation
    #[error("Role `{0}` is built-in and cannot be modified")]
    ImmutableRole(String),

    /// Actor lacks the rights to perform the requested mutation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting state: duplicate names, repeated membership
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Engine configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AccessError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a permission-denied error
    pub fn denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
