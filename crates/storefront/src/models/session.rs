//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use mercado_core::{Email, UserId, UserRole};

use super::user::User;

/// Session-stored user identity.
///
/// A denormalized snapshot of the user written at login. It mirrors the
/// stored user minus the password hash and is not refreshed afterwards, so
/// it can go stale if the user row changes while the session lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's given name.
    pub first_name: String,
    /// User's family name.
    pub last_name: String,
    /// User's email address.
    pub email: Email,
    /// User's age.
    pub age: i32,
    /// User's role.
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            age: user.age,
            role: user.role,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for the denormalized snapshot of the logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the bare user ID, written by the OAuth flow. Requests carrying
    /// only this key re-fetch the user from the store.
    pub const AUTH_USER_ID: &str = "auth_user_id";

    /// Key for GitHub OAuth state (CSRF protection).
    pub const GITHUB_OAUTH_STATE: &str = "github_oauth_state";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_snapshot_mirrors_user_without_password() {
        let user = User {
            id: UserId::new(5),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").expect("valid email"),
            age: 36,
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Standard,
            created_at: Utc::now(),
        };

        let snapshot = CurrentUser::from(&user);
        assert_eq!(snapshot.id, user.id);
        assert_eq!(snapshot.first_name, user.first_name);
        assert_eq!(snapshot.last_name, user.last_name);
        assert_eq!(snapshot.email, user.email);
        assert_eq!(snapshot.age, user.age);
        assert_eq!(snapshot.role, user.role);

        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(!json.contains("argon2"));
    }
}
