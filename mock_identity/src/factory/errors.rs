use thiserror::Error;

use crate::descriptor::DescriptorError;
use crate::lookup::LookupError;

/// Failures while resolving and installing a test identity
///
/// These happen before the test body runs and point at test configuration,
/// never at the behavior under test.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("Identity not found: {username}")]
    IdentityNotFound { username: String },

    #[error("Unknown lookup service: {0}")]
    UnknownLookupService(String),

    #[error("No lookup service configured")]
    NoLookupService,

    #[error("No security context factory registered for {descriptor_type}")]
    NoFactoryRegistered { descriptor_type: String },

    #[error("Lookup error: {0}")]
    Lookup(LookupError),

    #[error("Factory error: {0}")]
    Factory(String),
}

impl From<LookupError> for SetupError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(username) => SetupError::IdentityNotFound { username },
            other => SetupError::Lookup(other),
        }
    }
}
