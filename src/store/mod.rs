//! Local key-value store adapter.
//!
//! [`LocalStore`] is the only path to persisted state. It JSON-encodes values
//! under named keys on top of a [`StorageBackend`] and swallows every backend or
//! serde failure: reads degrade to `None`, writes to `false`.

mod backend;
mod error;

pub use backend::*;
pub use error::*;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Logical storage keys.
pub mod keys {
    pub const PRODUCTS: &str = "app_products";
    pub const USERS: &str = "app_users";
    pub const ORDERS: &str = "app_orders";
    pub const CART: &str = "cart";
    pub const SESSION: &str = "auth_user";
    pub const ROLE: &str = "user_type";
}

#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn new(backend: impl StorageBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Serializes `value` and commits it under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize value");
                return false;
            }
        };
        match self.backend.put_raw(key, text) {
            Ok(()) => {
                debug!(key, "Value saved");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to save value");
                false
            }
        }
    }

    /// Returns the stored value, or `None` if the key is unset or its content
    /// does not decode as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.backend.get_raw(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read value");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored value is corrupt");
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete_raw(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to remove value");
                false
            }
        }
    }
}
