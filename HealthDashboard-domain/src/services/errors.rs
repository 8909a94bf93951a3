use thiserror::Error;

use crate::entities::dose::DoseTransitionError;
use health_dashboard_data::repository::RepositoryError;

/// Errors surfaced by the store-backed services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Status change rejected
    #[error("Invalid dose transition: {0}")]
    Transition(#[from] DoseTransitionError),
}
