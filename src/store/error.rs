use thiserror::Error;

/// Failures raised by a [`StorageBackend`](super::StorageBackend).
///
/// These never leave [`LocalStore`](super::LocalStore): the adapter logs them and
/// degrades to "absent" reads and `false` write results.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded { used: usize, quota: usize },
    #[error("Storage I/O error on {key}: {message}")]
    Io { key: String, message: String },
    #[error("Storage lock poisoned")]
    Poisoned,
}
