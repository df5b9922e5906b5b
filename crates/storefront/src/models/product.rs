//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercado_core::{CurrencyCode, Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Merchant SKU code.
    pub code: String,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub stock: i32,
    /// Optional thumbnail image URL.
    pub thumbnail: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    pub stock: i32,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
