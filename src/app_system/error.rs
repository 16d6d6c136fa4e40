use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SystemError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cannot open the data store: {0}")]
    Storage(String),
    #[error("Seed data could not be loaded: {0}")]
    Initialization(String),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
