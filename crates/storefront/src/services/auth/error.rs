//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// `EmailTaken` and `InvalidCredentials` are business failures surfaced to
/// the caller with a message; they are never panics.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mercado_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A user with this email already exists.
    #[error("email already in use")]
    EmailTaken,

    /// The OAuth profile carried no email address to key the account on.
    #[error("identity provider profile has no email")]
    MissingOauthEmail,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
