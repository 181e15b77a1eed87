use crate::types::Id;

/// Domain-level error taxonomy shared by every Ringside crate.
///
/// `NotFound` is surfaced to the caller, never silently substituted.
/// `Validation` rejects a request before any mutation happens.
/// `Conflict` signals a stale-version write; the caller must reload.
/// `Transient` covers feed/network hiccups that callers retry or degrade
/// around; it never blanks a display.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: Id },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the `NotFound` variant.
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        Self::NotFound { entity, id }
    }
}
