//! System configuration, startup and shutdown, and the checkout flow that
//! spans several services.

pub mod checkout;
pub mod config;
pub mod error;
pub mod store_system;
pub mod tracing;

pub use checkout::*;
pub use config::*;
pub use error::*;
pub use store_system::*;
pub use self::tracing::*;
