//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercado_core::CartId;

use super::product::Product;

/// A shopping cart with its items.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// Items in the cart.
    pub items: Vec<CartItem>,
}

/// A single cart line: a product and its quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    /// The full product record.
    pub product: Product,
    /// How many units of the product are in the cart.
    pub quantity: i32,
}
