//! Cart repository for cart and cart-item CRUD.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mercado_core::{CartId, Price, ProductId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem};
use crate::models::product::Product;

/// Internal row type for cart header queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    created_at: DateTime<Utc>,
}

/// Internal row type for cart item queries (joined with products).
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    quantity: i32,
    product_id: i32,
    title: String,
    description: String,
    code: String,
    price: Decimal,
    currency: String,
    stock: i32,
    thumbnail: Option<String>,
    product_created_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let currency_code = row.currency.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Self {
            product: Product {
                id: ProductId::new(row.product_id),
                title: row.title,
                description: row.description,
                code: row.code,
                price: Price::new(row.price, currency_code),
                stock: row.stock,
                thumbnail: row.thumbnail,
                created_at: row.product_created_at,
            },
            quantity: row.quantity,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts DEFAULT VALUES RETURNING id, created_at",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(Cart {
            id: CartId::new(row.id),
            created_at: row.created_at,
            items: Vec::new(),
        })
    }

    /// Get a cart with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a joined product row is invalid.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let cart_row = sqlx::query_as::<_, CartRow>("SELECT id, created_at FROM carts WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        let Some(cart_row) = cart_row else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT ci.quantity, p.id AS product_id, p.title, p.description, p.code, \
                    p.price, p.currency, p.stock, p.thumbnail, p.created_at AS product_created_at \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY p.id ASC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CartItem>, _>>()?;

        Ok(Some(Cart {
            id: CartId::new(cart_row.id),
            created_at: cart_row.created_at,
            items,
        }))
    }

    /// Add a product to a cart, incrementing the quantity if already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart or product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity) \
             SELECT c.id, p.id, $3 FROM carts c, products p WHERE c.id = $1 AND p.id = $2 \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set the quantity of a product already in a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item isn't in the cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove a product from a cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was removed, `false` if it wasn't present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id.as_i32())
            .bind(product_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a cart and its items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the cart was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
