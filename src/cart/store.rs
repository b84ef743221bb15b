//! Session-keyed cart persistence. Handlers obtain an explicit store handle,
//! look the cart up by session id, mutate, and write back; nothing here is
//! ambient request state. Concurrent requests from one session race without
//! locking, matching the hosting model this was built for.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cart::compute_totals;
use crate::cart::tax::TaxHandler;
use crate::forms::CleanedCartLine;
use crate::models::{Cart, CartItem, Sellable};

const CART_COLUMNS: &str = "id, session_id, subtotal, tax_total, total, last_updated";
const ITEM_COLUMNS: &str = "id, cart_id, sku, description, unit_price, quantity, total_price";

pub struct CartStore<'a> {
    pool: &'a PgPool,
    ttl: Duration,
}

impl<'a> CartStore<'a> {
    pub fn new(pool: &'a PgPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    async fn fetch(&self, session_id: Uuid) -> Result<Option<Cart>, sqlx::Error> {
        sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(self.pool)
        .await
    }

    /// Cart for adding items: creates one for a new session and resets one
    /// that has sat idle past the TTL.
    pub async fn open(&self, session_id: Uuid) -> Result<Cart, sqlx::Error> {
        if let Some(cart) = self.fetch(session_id).await? {
            if !cart.is_expired(Utc::now(), self.ttl) {
                return Ok(cart);
            }
            return self.reset(cart.id).await;
        }

        sqlx::query_as::<_, Cart>(&format!(
            "INSERT INTO carts (id, session_id) VALUES ($1, $2)
             ON CONFLICT (session_id) DO UPDATE SET last_updated = now()
             RETURNING {CART_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(session_id)
        .fetch_one(self.pool)
        .await
    }

    /// Cart for reviewing: `None` when the session has no usable cart (never
    /// created, or expired). The portal reports that as a timed-out session.
    pub async fn live(
        &self,
        session_id: Uuid,
    ) -> Result<Option<(Cart, Vec<CartItem>)>, sqlx::Error> {
        let Some(cart) = self.fetch(session_id).await? else {
            return Ok(None);
        };
        if cart.is_expired(Utc::now(), self.ttl) {
            return Ok(None);
        }
        let items = self.items(cart.id).await?;
        Ok(Some((cart, items)))
    }

    pub async fn items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY created_at"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await
    }

    /// Adds a sellable to the cart, merging with an existing line for the
    /// same sku by incrementing its quantity.
    pub async fn add_item(
        &self,
        cart_id: Uuid,
        sellable: &Sellable,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO cart_items (id, cart_id, sku, description, unit_price, quantity, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $5 * $6)
             ON CONFLICT (cart_id, sku) DO UPDATE
             SET quantity = cart_items.quantity + excluded.quantity,
                 total_price = cart_items.unit_price * (cart_items.quantity + excluded.quantity)",
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(&sellable.sku)
        .bind(&sellable.description)
        .bind(sellable.unit_price)
        .bind(quantity as i32)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Persists a cleaned cart-review formset: quantity edits and removals,
    /// atomically. A line edited to zero is a removal.
    pub async fn apply_lines(
        &self,
        cart_id: Uuid,
        lines: &[CleanedCartLine],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for line in lines {
            if line.remove || line.quantity == 0 {
                sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
                    .bind(line.id)
                    .bind(cart_id)
                    .execute(&mut *tx)
                    .await?;
            } else {
                sqlx::query(
                    "UPDATE cart_items
                     SET quantity = $1, total_price = unit_price * $1
                     WHERE id = $2 AND cart_id = $3",
                )
                .bind(line.quantity as i32)
                .bind(line.id)
                .bind(cart_id)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await
    }

    /// Recomputes subtotal, tax and total from the current line items and
    /// writes them onto the cart row, refreshing its idle timer.
    pub async fn recalculate(
        &self,
        cart_id: Uuid,
        tax: &dyn TaxHandler,
    ) -> Result<Cart, sqlx::Error> {
        let items = self.items(cart_id).await?;
        let totals = compute_totals(&items, tax);

        sqlx::query_as::<_, Cart>(&format!(
            "UPDATE carts
             SET subtotal = $1, tax_total = $2, total = $3, last_updated = now()
             WHERE id = $4
             RETURNING {CART_COLUMNS}"
        ))
        .bind(totals.subtotal)
        .bind(totals.tax_total)
        .bind(totals.total)
        .bind(cart_id)
        .fetch_one(self.pool)
        .await
    }

    async fn reset(&self, cart_id: Uuid) -> Result<Cart, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "UPDATE carts
             SET subtotal = 0, tax_total = 0, total = 0, last_updated = now()
             WHERE id = $1
             RETURNING {CART_COLUMNS}"
        ))
        .bind(cart_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(cart)
    }
}
