//! User records: the repository entity and its errors.

pub mod entity;
pub mod error;

pub use error::*;
