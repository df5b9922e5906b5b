//! Integration tests for the products and carts JSON APIs.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The storefront server running (cargo run -p mercado-storefront)
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use mercado_integration_tests::{client, storefront_base_url};

/// Create a product and return its JSON representation.
async fn create_product(client: &reqwest::Client, title: &str) -> serde_json::Value {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "title": title,
            "description": "Integration test product",
            "code": "IT-001",
            "price": "24.50",
            "stock": 12
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product JSON")
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_crud_roundtrip() {
    let client = client();
    let base_url = storefront_base_url();

    let created = create_product(&client, "Mate gourd").await;
    let id = created["id"].as_i64().expect("product id");
    assert_eq!(created["title"], "Mate gourd");
    assert_eq!(created["stock"], 12);

    // Read it back
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);

    // Replace it
    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({
            "title": "Mate gourd (carved)",
            "description": "Integration test product",
            "code": "IT-001",
            "price": "29.00",
            "stock": 7
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: serde_json::Value = resp.json().await.expect("Failed to parse product JSON");
    assert_eq!(updated["title"], "Mate gourd (carved)");
    assert_eq!(updated["stock"], 7);

    // Delete it, then a second delete 404s
    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_missing_product_is_404() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/products/999999999"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_add_increment_and_remove() {
    let client = client();
    let base_url = storefront_base_url();

    let product = create_product(&client, "Thermos").await;
    let pid = product["id"].as_i64().expect("product id");

    // Create an empty cart
    let resp = client
        .post(format!("{base_url}/api/carts"))
        .send()
        .await
        .expect("Failed to create cart");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let cart: serde_json::Value = resp.json().await.expect("Failed to parse cart JSON");
    let cart_id = cart["id"].as_i64().expect("cart id");
    assert_eq!(cart["items"].as_array().expect("items").len(), 0);

    // Adding the same product twice increments the quantity
    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/api/carts/{cart_id}/products/{pid}"))
            .send()
            .await
            .expect("Failed to add product to cart");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let resp = client
        .get(format!("{base_url}/api/carts/{cart_id}"))
        .send()
        .await
        .expect("Failed to get cart");
    let cart: serde_json::Value = resp.json().await.expect("Failed to parse cart JSON");
    let items = cart["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["product"]["id"], pid);

    // Set an explicit quantity
    let resp = client
        .put(format!("{base_url}/api/carts/{cart_id}/products/{pid}"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Remove the item, then removing again 404s
    let resp = client
        .delete(format!("{base_url}/api/carts/{cart_id}/products/{pid}"))
        .send()
        .await
        .expect("Failed to remove product from cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base_url}/api/carts/{cart_id}/products/{pid}"))
        .send()
        .await
        .expect("Failed to remove product from cart");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Delete the cart
    let resp = client
        .delete(format!("{base_url}/api/carts/{cart_id}"))
        .send()
        .await
        .expect("Failed to delete cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
