use thiserror::Error;

use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use crate::validation::ValidationReport;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error("Administrator accounts cannot be modified: {0}")]
    ProtectedAdmin(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Form has {} invalid field(s)", .0.errors.len())]
    Invalid(ValidationReport),
    #[error("Este RUN ya está registrado")]
    DuplicateRun(String),
    #[error("Este email ya está registrado")]
    DuplicateEmail(String),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Product(#[from] ProductError),
}
