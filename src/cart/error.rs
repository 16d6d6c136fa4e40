use thiserror::Error;

use crate::product_actor::ProductError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Only {available} units of {code} are available (requested {requested})")]
    InsufficientStock {
        code: String,
        requested: u32,
        available: u32,
    },
    #[error("Quantity must be positive")]
    InvalidQuantity,
    #[error("Failed to persist the cart")]
    StorageError,
    #[error("Product lookup failed: {0}")]
    Product(ProductError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<ProductError> for CartError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(code) => Self::ProductNotFound(code),
            ProductError::InsufficientStock {
                code,
                requested,
                available,
            } => Self::InsufficientStock {
                code,
                requested,
                available,
            },
            other => Self::Product(other),
        }
    }
}
