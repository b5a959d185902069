use super::repository::RepositoryError;

/// Business-rule violations raised by the placement services.
///
/// Every variant except `Repository` carries the message shown to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Ownership(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    StaleState(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlacementError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::Ownership(_) => "ownership",
            Self::Conflict(_) => "conflict",
            Self::Validation(_) => "validation",
            Self::StaleState(_) => "stale_state",
            Self::Repository(_) => "internal",
        }
    }

    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub(crate) fn invalid_state(message: &str) -> Self {
        Self::InvalidState(message.to_string())
    }

    pub(crate) fn ownership(message: &str) -> Self {
        Self::Ownership(message.to_string())
    }

    pub(crate) fn validation(message: &str) -> Self {
        Self::Validation(message.to_string())
    }

    /// Maps a failed compare-and-swap to `StaleState`; other storage errors pass through.
    pub(crate) fn on_update(err: RepositoryError, stale_message: &str) -> Self {
        match err {
            RepositoryError::StaleVersion => Self::StaleState(stale_message.to_string()),
            other => Self::Repository(other),
        }
    }

    /// Maps a uniqueness violation to `Conflict`; other storage errors pass through.
    pub(crate) fn on_insert(err: RepositoryError, conflict_message: &str) -> Self {
        match err {
            RepositoryError::Conflict => Self::Conflict(conflict_message.to_string()),
            other => Self::Repository(other),
        }
    }
}
