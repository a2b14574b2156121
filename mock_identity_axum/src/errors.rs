use thiserror::Error;

/// Failures of the mock HTTP layer itself (not of the behavior under test)
#[derive(Debug, Error)]
pub enum MockMvcError {
    #[error("Request build error: {0}")]
    Http(#[from] http::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Body error: {0}")]
    Body(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

impl From<serde_json::Error> for MockMvcError {
    fn from(err: serde_json::Error) -> Self {
        MockMvcError::Session(err.to_string())
    }
}

/// A result matcher did not hold
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionError {
    #[error("Expected an authenticated user but was {found}")]
    NotAuthenticated { found: String },

    #[error("Expected no authenticated user but found {username}")]
    UnexpectedlyAuthenticated { username: String },

    #[error("Expected username {expected} but was {actual}")]
    UsernameMismatch { expected: String, actual: String },

    #[error("Expected authorities {expected:?} but were {actual:?}")]
    AuthoritiesMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Authentication did not satisfy: {0}")]
    Predicate(String),

    #[error("Invalid expectation: {0}")]
    InvalidExpectation(String),
}
