use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Lookup backend error: {0}")]
    Backend(String),
}
