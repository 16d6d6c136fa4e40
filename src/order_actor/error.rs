use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order number {0} is already taken")]
    DuplicateOrder(String),
    #[error("Order rejected: {0}")]
    Rejected(String),
    #[error("Order storage error: {0}")]
    StorageError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::DuplicateKey(number) => Self::DuplicateOrder(number),
            FrameworkError::NotFound(number) => Self::NotFound(number),
            FrameworkError::Rejected(msg) => Self::Rejected(msg),
            FrameworkError::Storage(collection) => Self::StorageError(collection),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(e.to_string())
            }
        }
    }
}
