//! User domain types.

use chrono::{DateTime, Utc};

use mercado_core::{Email, UserId, UserRole};

/// A registered storefront user.
///
/// The password hash travels with the user so the login flow can verify
/// credentials in one lookup; it never leaves the auth layer.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's given name.
    pub first_name: String,
    /// User's family name. Blank for OAuth-provisioned accounts.
    pub last_name: String,
    /// User's email address.
    pub email: Email,
    /// User's age. Zero for OAuth-provisioned accounts.
    pub age: i32,
    /// Argon2 password hash. Blank for OAuth-provisioned accounts, which
    /// therefore cannot log in with the local strategy.
    pub password_hash: String,
    /// Role decided at creation time; never promoted afterwards.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub age: i32,
    pub password_hash: String,
    pub role: UserRole,
}
