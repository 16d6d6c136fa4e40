use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("A user with RUN {0} already exists")]
    AlreadyExists(String),
    #[error("User rejected: {0}")]
    Rejected(String),
    #[error("User storage error: {0}")]
    StorageError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::DuplicateKey(run) => Self::AlreadyExists(run),
            FrameworkError::NotFound(run) => Self::NotFound(run),
            FrameworkError::Rejected(msg) => Self::Rejected(msg),
            FrameworkError::Storage(collection) => Self::StorageError(collection),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(e.to_string())
            }
        }
    }
}
