//! GitHub OAuth route handlers.
//!
//! Handles the OAuth flow for GitHub login:
//! - Login: redirects to GitHub's authorization page
//! - Callback: validates state, exchanges the code, resolves the user

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::middleware::set_auth_user_id;
use crate::models::session::session_keys;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Query parameters from the GitHub OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for a token.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Initiate GitHub OAuth login.
///
/// Generates a state parameter, stores it in the session, and redirects to
/// GitHub's authorization page.
///
/// # Route
///
/// `GET /api/sessions/github`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::GITHUB_OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!(error = %e, "failed to store OAuth state in session");
        return Redirect::to("/login?error=session").into_response();
    }

    let auth_url = state.github().authorization_url(&oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the GitHub OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for a
/// token, fetches the profile, and resolves it to a user — auto-creating
/// one on first login. Only the user ID is stored in the session; requests
/// re-fetch the user from the store.
///
/// # Route
///
/// `GET /api/sessions/githubcallback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for OAuth errors from GitHub
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("GitHub OAuth error: {} - {}", error, description);
        return Redirect::to("/login?error=github_denied").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("GitHub OAuth callback missing code");
        return Redirect::to("/login?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("GitHub OAuth callback missing state");
        return Redirect::to("/login?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::GITHUB_OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("GitHub OAuth state mismatch");
        return Redirect::to("/login?error=invalid_state").into_response();
    }

    // Clear the stored state (one-time use)
    let _ = session
        .remove::<String>(session_keys::GITHUB_OAUTH_STATE)
        .await;

    // Exchange code for an access token
    let access_token = match state.github().exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to exchange GitHub OAuth code");
            return Redirect::to("/login?error=token_exchange").into_response();
        }
    };

    // Fetch the profile
    let profile = match state.github().fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch GitHub profile");
            return Redirect::to("/login?error=profile_fetch").into_response();
        }
    };

    // Resolve the profile to a user, provisioning on first login
    let service = AuthService::new(
        UserRepository::new(state.pool().clone()),
        state.config().admin.clone(),
    );
    let user = match service.oauth_login(&profile).await {
        Ok(user) => user,
        Err(AuthError::MissingOauthEmail) => {
            tracing::warn!("GitHub profile has no usable email");
            return Redirect::to("/login?error=github_email").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "GitHub login failed");
            return Redirect::to("/login?error=failed").into_response();
        }
    };

    if let Err(e) = set_auth_user_id(&session, user.id).await {
        tracing::error!(error = %e, "failed to write session");
        return Redirect::to("/login?error=session").into_response();
    }

    tracing::info!(user_id = %user.id, "GitHub user authenticated");

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_strings_differ() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }
}
