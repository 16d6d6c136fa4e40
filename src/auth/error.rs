use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Email o contraseña incorrectos")]
    InvalidCredentials,
    #[error("Failed to persist the session")]
    SessionNotSaved,
    #[error("Failed to clear the session")]
    SessionNotCleared,
}
