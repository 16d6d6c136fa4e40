//! Order records: the repository entity, construction and errors.

pub mod builder;
pub mod entity;
pub mod error;

pub use builder::*;
pub use error::*;
