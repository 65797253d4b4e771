//! Error types for geosample.

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoSampleError>;

/// A rejected request parameter, reported by field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeoSampleError {
    /// Malformed or out-of-range input; raised before any store query.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("post not found: {0}")]
    NotFound(String),

    /// The geospatial store failed or could not be reached.
    #[error("store error: {0}")]
    Store(String),

    #[error("query exceeded its deadline of {0:?}")]
    Timeout(Duration),

    /// A cell query task panicked or was cancelled.
    #[error("cell task failed: {0}")]
    Task(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GeoSampleError {
    /// The offending field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            GeoSampleError::Validation(e) => Some(&e.field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GeoSampleError::Validation(_))
    }
}
