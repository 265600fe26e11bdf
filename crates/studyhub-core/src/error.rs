//! Core error types for studyhub-core

use std::fmt;

use thiserror::Error;

/// A rejected input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur in store, queryset and pagination operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource name (`study`, `assay`)
        resource: &'static str,
        /// Identifier as requested
        id: String,
    },

    /// Requested page is outside the valid range or not a number
    #[error("invalid page {page:?}: {reason}")]
    InvalidPage {
        /// Raw page parameter
        page: String,
        /// Why the page was rejected
        reason: &'static str,
    },

    /// Input failed validation
    #[error(
        "validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Validation(Vec<FieldError>),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl CoreError {
    /// Not-found error for `resource` with the given identifier
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
