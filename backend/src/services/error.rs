//! Error taxonomy of the horse service layer.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A directly requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Submitted data is structurally invalid, independent of other records.
    #[error("{summary}: {}", .errors.join("; "))]
    Validation { summary: String, errors: Vec<String> },

    /// Submitted data is well-formed but contradicts existing records.
    #[error("{summary}: {}", .errors.join("; "))]
    Conflict { summary: String, errors: Vec<String> },

    /// A reference that was validated at write time no longer resolves.
    #[error("Unexpected state: {0}")]
    Fatal(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn validation(summary: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Validation {
            summary: summary.into(),
            errors,
        }
    }

    pub fn conflict(summary: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Conflict {
            summary: summary.into(),
            errors,
        }
    }

    /// Individual messages of a batched failure; empty for single-cause errors.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Validation { errors, .. } | Self::Conflict { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Map a repository lookup failure onto the caller-facing taxonomy:
    /// a missing entity becomes `NotFound`, anything else stays a repository error.
    pub(crate) fn from_lookup(err: RepositoryError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.message().to_string())
        } else {
            Self::Repository(err)
        }
    }
}
