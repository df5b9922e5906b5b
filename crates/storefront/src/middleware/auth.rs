//! Authentication extractors.
//!
//! Provides extractors for the "is there a session user" guard on views and
//! API routes. Local login stores a denormalized [`CurrentUser`] snapshot;
//! the OAuth flow stores only the user ID, which is re-fetched from the
//! credential store on every request (the serialize/deserialize contract).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use mercado_core::UserId;

use crate::db::UserRepository;
use crate::models::session::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, view routes redirect to the login page and API
/// routes get a 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.first_name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Resolve the current user from the session, if any.
///
/// Prefers the snapshot written at local login; falls back to a fresh
/// store lookup for OAuth sessions that carry only the user ID.
async fn resolve_current_user(session: &Session, state: &AppState) -> Option<CurrentUser> {
    if let Ok(Some(user)) = session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        return Some(user);
    }

    let id = session
        .get::<UserId>(session_keys::AUTH_USER_ID)
        .await
        .ok()
        .flatten()?;

    match UserRepository::new(state.pool().clone()).get_by_id(id).await {
        Ok(Some(user)) => Some(CurrentUser::from(&user)),
        Ok(None) => None,
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to deserialize session user");
            None
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        match resolve_current_user(&session, state).await {
            Some(user) => Ok(Self(user)),
            None => {
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    Err(AuthRejection::Unauthorized)
                } else {
                    Err(AuthRejection::RedirectToLogin)
                }
            }
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>().cloned() {
            Some(session) => resolve_current_user(&session, state).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session: the snapshot plus the bare ID.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::AUTH_USER_ID, user.id).await
}

/// Store only the user ID in the session (OAuth serialization).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_user_id(
    session: &Session,
    id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_USER_ID, id).await
}

/// Clear the logged-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.remove::<UserId>(session_keys::AUTH_USER_ID).await?;
    Ok(())
}
