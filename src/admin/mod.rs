//! Back-office operations: user and order management plus the dashboard.
//!
//! Callers are expected to check [`AuthService::admin_access`](crate::auth::AuthService::admin_access)
//! before reaching these.

pub mod dashboard;
mod error;
pub mod orders;
pub mod users;

pub use dashboard::{DashboardService, DashboardStats};
pub use error::*;
pub use orders::{OrderAdmin, OrderFilter, OrderStats};
pub use users::{UserAdmin, UserFilter, UserStats};

/// Case-insensitive substring match. An unset needle matches everything.
fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
