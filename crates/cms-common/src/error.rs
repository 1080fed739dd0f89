//! Error types for the CMS engine

use thiserror::Error;

/// CMS error type
///
/// Every operation terminates with at most one of these. Not-found and
/// unauthorized carry generic messages so nothing leaks about other tenants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CmsError {
    /// Entity absent or outside the caller's organization
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable entity kind, e.g. "Document type"
        entity: &'static str,
    },

    /// Title/slug collision
    #[error("{0}")]
    Conflict(String),

    /// Schema or command shape violation (first violation wins)
    #[error("{message}")]
    ValidationFailed {
        /// Message of the failing rule
        message: String,
        /// Offending field name, when one is known
        field: Option<String>,
        /// Stable rule code
        rule: Option<String>,
    },

    /// Operation blocked by dependent records
    #[error("{0}")]
    PreconditionFailed(String),

    /// Actor or organization context missing
    #[error("unauthorized")]
    Unauthorized,

    /// Persistence layer failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl CmsError {
    /// Not-found error for an entity kind
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Validation error without field detail
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            field: None,
            rule: None,
        }
    }

    /// Validation error pointing at a field and rule
    pub fn invalid_field(
        message: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            field: Some(field.into()),
            rule: Some(rule.into()),
        }
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::PreconditionFailed(_) => "PRECONDITION_FAILED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type for the CMS engine
pub type CmsResult<T> = Result<T, CmsError>;
