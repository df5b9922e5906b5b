//! Authentication service.
//!
//! Three flows, selected by route: local registration, local login, and
//! GitHub OAuth exchange. All of them resolve to a [`User`] through the
//! [`UserStore`] port.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use mercado_core::{Email, UserId, UserRole};

use crate::config::AdminCredentials;
use crate::db::RepositoryError;
use crate::models::user::{NewUser, User};
use crate::services::github::GithubProfile;

/// Persistence port for user accounts.
///
/// Implemented by the sqlx-backed `UserRepository`; tests substitute an
/// in-memory store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email.
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Persist a new user.
    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError>;
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub password: String,
}

/// Authentication service.
///
/// Handles user registration, login, and OAuth account resolution.
pub struct AuthService<S> {
    users: S,
    admin: AdminCredentials,
}

impl<S: UserStore> AuthService<S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: S, admin: AdminCredentials) -> Self {
        Self { users, admin }
    }

    /// Register a new user with email and password.
    ///
    /// Uniqueness is enforced by a pre-check only; the role is decided here,
    /// once, by comparing the submitted pair against the configured
    /// administrator credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let email = Email::parse(&input.email)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let role = if self.admin.matches(email.as_str(), &input.password) {
            UserRole::Administrator
        } else {
            UserRole::Standard
        };

        let password_hash = hash_password(&input.password)?;

        let user = self
            .users
            .create(&NewUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email,
                age: input.age,
                password_hash,
                role,
            })
            .await?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// the password doesn't verify; the two cases are indistinguishable to
    /// the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Resolve a GitHub profile to a user, auto-provisioning on first login.
    ///
    /// The provisioned account gets the profile's display name, a blank last
    /// name, zero age, and a blank password hash, so it can never log in via
    /// the local strategy. Repeated logins for the same profile email return
    /// the same user without creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingOauthEmail` if the profile carries no email.
    pub async fn oauth_login(&self, profile: &GithubProfile) -> Result<User, AuthError> {
        let email = profile
            .email
            .as_deref()
            .ok_or(AuthError::MissingOauthEmail)?;
        let email = Email::parse(email)?;

        if let Some(user) = self.users.get_by_email(&email).await? {
            return Ok(user);
        }

        let user = self
            .users
            .create(&NewUser {
                first_name: profile.name.clone().unwrap_or_default(),
                last_name: String::new(),
                email,
                age: 0,
                password_hash: String::new(),
                role: UserRole::Standard,
            })
            .await?;

        Ok(user)
    }

    /// Get a user by ID, for session deserialization.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(id).await?)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// A blank stored hash (OAuth-provisioned account) fails to parse and is
/// reported as invalid credentials.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI32, Ordering};

    use chrono::Utc;
    use secrecy::SecretString;

    use crate::models::session::CurrentUser;

    /// In-memory store standing in for the sqlx repository.
    #[derive(Default)]
    struct MemoryUserStore {
        users: Mutex<Vec<User>>,
        next_id: AtomicI32,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.email == email).cloned())
        }

        async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
            let user = User {
                id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                first_name: new_user.first_name.clone(),
                last_name: new_user.last_name.clone(),
                email: new_user.email.clone(),
                age: new_user.age,
                password_hash: new_user.password_hash.clone(),
                role: new_user.role,
                created_at: Utc::now(),
            };
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }
    }

    fn admin_pair() -> AdminCredentials {
        AdminCredentials {
            email: "admin@mercado.test".to_string(),
            password: SecretString::from("let-me-administrate"),
        }
    }

    fn service() -> AuthService<MemoryUserStore> {
        AuthService::new(MemoryUserStore::default(), admin_pair())
    }

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            email: email.to_string(),
            age: 30,
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails_without_second_create() {
        let service = service();
        service
            .register(register_input("ana@example.com", "pass1234"))
            .await
            .unwrap();

        let err = service
            .register(register_input("ana@example.com", "otherpass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(service.users.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_admin_pair_gets_administrator_role() {
        let service = service();
        let user = service
            .register(register_input("admin@mercado.test", "let-me-administrate"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Administrator);
    }

    #[tokio::test]
    async fn test_register_other_pairs_get_standard_role() {
        let service = service();

        // Admin email with the wrong password stays standard
        let user = service
            .register(register_input("admin@mercado.test", "wrong-password"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Standard);

        let user = service
            .register(register_input("ana@example.com", "let-me-administrate"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Standard);
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let service = service();
        service
            .register(register_input("ana@example.com", "pass1234"))
            .await
            .unwrap();

        let err = service
            .login("ana@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email_rejected() {
        let service = service();
        let err = service
            .login("nobody@example.com", "pass1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_success_snapshot_mirrors_user() {
        let service = service();
        let registered = service
            .register(register_input("ana@example.com", "pass1234"))
            .await
            .unwrap();

        let user = service.login("ana@example.com", "pass1234").await.unwrap();
        let snapshot = CurrentUser::from(&user);

        assert_eq!(snapshot.id, registered.id);
        assert_eq!(snapshot.first_name, "Ana");
        assert_eq!(snapshot.last_name, "Gomez");
        assert_eq!(snapshot.email.as_str(), "ana@example.com");
        assert_eq!(snapshot.age, 30);
        assert_eq!(snapshot.role, UserRole::Standard);
    }

    #[tokio::test]
    async fn test_oauth_login_provisions_blank_profile_once() {
        let service = service();
        let profile = GithubProfile {
            name: Some("Ana Gomez".to_string()),
            email: Some("ana@example.com".to_string()),
        };

        let first = service.oauth_login(&profile).await.unwrap();
        assert_eq!(first.first_name, "Ana Gomez");
        assert_eq!(first.last_name, "");
        assert_eq!(first.age, 0);
        assert_eq!(first.password_hash, "");

        let second = service.oauth_login(&profile).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(service.users.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oauth_provisioned_account_cannot_login_locally() {
        let service = service();
        let profile = GithubProfile {
            name: None,
            email: Some("ana@example.com".to_string()),
        };
        service.oauth_login(&profile).await.unwrap();

        let err = service.login("ana@example.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_oauth_profile_without_email_rejected() {
        let service = service();
        let profile = GithubProfile {
            name: Some("Ana".to_string()),
            email: None,
        };
        let err = service.oauth_login(&profile).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingOauthEmail));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("pass1234").unwrap();
        assert!(verify_password("pass1234", &hash).is_ok());
        assert!(verify_password("pass12345", &hash).is_err());
    }

    #[test]
    fn test_blank_hash_never_verifies() {
        assert!(matches!(
            verify_password("anything", ""),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
