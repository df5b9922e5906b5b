//! Product route handlers: the listing view and the JSON CRUD API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use mercado_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::product::{NewProduct, Product};
use crate::models::session::CurrentUser;
use crate::state::AppState;

// =============================================================================
// View
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    /// The logged-in user.
    pub user: CurrentUser,
    /// All catalog products.
    pub products: Vec<Product>,
}

/// Display the product listing page.
pub async fn products_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<ProductsTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(ProductsTemplate { user, products })
}

// =============================================================================
// JSON API
// =============================================================================

/// List all products.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Get one product.
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool()).create(&payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &payload)
        .await?;

    Ok(Json(product))
}

/// Delete a product.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}
