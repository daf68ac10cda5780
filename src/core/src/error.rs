use thiserror::Error;

/// Failure taxonomy shared by the whole engine. `NotFound` and `InvalidInput`
/// always surface to the caller; `InsufficientData` marks operations that the
/// caller may degrade into a logged skip; `Persistence` aborts and rolls back
/// the enclosing logical transaction.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
