//! Domain errors shared by the history and auth layers.
//!
//! Analysis failures have their own [`crate::analysis::AnalysisError`].

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No record with this id is visible to the caller. A record owned by
    /// someone else is reported the same way.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain rule (missing code or language).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, malformed or expired bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
