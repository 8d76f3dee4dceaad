use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field was missing; the message is returned to the caller as-is.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }
}
