use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("A product with code {0} already exists")]
    AlreadyExists(String),
    #[error("Insufficient stock for {code}: requested {requested}, available {available}")]
    InsufficientStock {
        code: String,
        requested: u32,
        available: u32,
    },
    #[error("Product rejected: {0}")]
    Rejected(String),
    #[error("Product storage error: {0}")]
    StorageError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ProductError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::DuplicateKey(code) => Self::AlreadyExists(code),
            FrameworkError::NotFound(code) => Self::NotFound(code),
            FrameworkError::Rejected(msg) => Self::Rejected(msg),
            FrameworkError::Storage(collection) => Self::StorageError(collection),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(e.to_string())
            }
        }
    }
}
