//! Local session route handlers: registration, login, logout, and the
//! current-session endpoint, plus the login/register views.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::middleware::{OptionalUser, RequireUser, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::services::auth::{AuthError, AuthService, RegisterInput};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// View Routes
// =============================================================================

/// Display the login page. Already-authenticated visitors go home.
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Display the registration page. Already-authenticated visitors go home.
pub async fn register_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate { error: query.error }.into_response()
}

// =============================================================================
// Action Routes
// =============================================================================

/// Build the auth service for a request.
fn auth_service(state: &AppState) -> AuthService<UserRepository> {
    AuthService::new(
        UserRepository::new(state.pool().clone()),
        state.config().admin.clone(),
    )
}

/// Handle registration form submission.
///
/// A taken email is a business failure surfaced as a message on the form,
/// never a 500.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let input = RegisterInput {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        age: form.age,
        password: form.password,
    };

    match auth_service(&state).register(input).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(AuthError::EmailTaken) => {
            Redirect::to("/register?error=email_taken").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/register?error=invalid_email").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "registration failed");
            Redirect::to("/register?error=failed").into_response()
        }
    }
}

/// Handle login form submission.
///
/// On success the denormalized session snapshot is written; it mirrors the
/// stored user minus the password hash.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match auth_service(&state).login(&form.email, &form.password).await {
        Ok(user) => {
            let snapshot = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &snapshot).await {
                tracing::error!(error = %e, "failed to write session");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            Redirect::to("/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            Redirect::to("/login?error=failed").into_response()
        }
    }
}

/// Handle logout: clear the user and destroy the whole session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session user");
    }

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session");
    }

    Redirect::to("/login").into_response()
}

/// Return the current session snapshot as JSON; 401 when anonymous.
pub async fn current(RequireUser(user): RequireUser) -> impl IntoResponse {
    Json(user)
}
