//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::RequireUser;
use crate::models::session::CurrentUser;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// The logged-in user.
    pub user: CurrentUser,
}

/// Display the home page. Anonymous visitors are redirected to the login
/// page by the extractor.
pub async fn home(RequireUser(user): RequireUser) -> impl IntoResponse {
    HomeTemplate { user }
}
