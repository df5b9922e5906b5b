//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (requires session user)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Views (session-guarded except login/register)
//! GET  /chat                   - Chat page
//! GET  /products               - Product listing page
//! GET  /login                  - Login form
//! GET  /register               - Registration form
//!
//! # Products API
//! GET    /api/products         - List products
//! GET    /api/products/{id}    - One product
//! POST   /api/products         - Create product
//! PUT    /api/products/{id}    - Replace product
//! DELETE /api/products/{id}    - Delete product
//!
//! # Carts API
//! POST   /api/carts                          - Create empty cart
//! GET    /api/carts/{id}                     - Cart with items
//! DELETE /api/carts/{id}                     - Delete cart
//! POST   /api/carts/{id}/products/{pid}      - Add product (increments)
//! PUT    /api/carts/{id}/products/{pid}      - Set quantity
//! DELETE /api/carts/{id}/products/{pid}      - Remove product
//!
//! # Sessions API
//! POST /api/sessions/register        - Local registration
//! POST /api/sessions/login           - Local login
//! POST /api/sessions/logout          - Logout
//! GET  /api/sessions/current         - Current session snapshot (JSON)
//! GET  /api/sessions/github          - Redirect to GitHub OAuth
//! GET  /api/sessions/githubcallback  - OAuth callback
//!
//! # Realtime
//! GET  /ws                     - Channel upgrade (unauthenticated)
//! ```

pub mod carts;
pub mod chat;
pub mod github_auth;
pub mod home;
pub mod products;
pub mod sessions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the sessions API router (local auth + GitHub OAuth).
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(sessions::register))
        .route("/login", post(sessions::login))
        .route("/logout", post(sessions::logout))
        .route("/current", get(sessions::current))
        // GitHub OAuth
        .route("/github", get(github_auth::login))
        .route("/githubcallback", get(github_auth::callback))
}

/// Create the products API router.
pub fn product_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the carts API router.
pub fn cart_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route("/{id}", get(carts::show).delete(carts::delete))
        .route(
            "/{id}/products/{pid}",
            post(carts::add_product)
                .put(carts::set_quantity)
                .delete(carts::remove_product),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Views
        .route("/", get(home::home))
        .route("/chat", get(chat::chat_page))
        .route("/products", get(products::products_page))
        .route("/login", get(sessions::login_page))
        .route("/register", get(sessions::register_page))
        // APIs
        .nest("/api/products", product_api_routes())
        .nest("/api/carts", cart_api_routes())
        .nest("/api/sessions", session_routes())
        // Realtime channel
        .route("/ws", get(chat::ws_upgrade))
}
