use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One cart per browser session. Totals are denormalized onto the row and
/// recomputed after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub session_id: Uuid,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl Cart {
    /// A cart idle longer than the configured TTL counts as timed out; the
    /// portal reports it the same way as a missing cart.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_updated > ttl
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub sku: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

impl CartItem {
    pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
        unit_price * Decimal::from(quantity)
    }
}

pub fn subtotal_of(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| CartItem::line_total(item.unit_price, item.quantity))
        .sum()
}

pub fn has_items(items: &[CartItem]) -> bool {
    items.iter().any(|item| item.quantity > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, unit_price: Decimal, quantity: i32) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            cart_id: Uuid::new_v4(),
            sku: sku.to_string(),
            description: sku.to_string(),
            unit_price,
            quantity,
            total_price: CartItem::line_total(unit_price, quantity),
        }
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let items = vec![
            item("A", Decimal::new(1050, 2), 2),
            item("B", Decimal::new(425, 2), 1),
        ];
        assert_eq!(subtotal_of(&items), Decimal::new(2525, 2));
    }

    #[test]
    fn cart_with_only_zero_quantity_lines_is_empty() {
        let items = vec![item("A", Decimal::new(1000, 2), 0)];
        assert!(!has_items(&items));
        assert!(has_items(&[item("A", Decimal::new(1000, 2), 1)]));
    }

    #[test]
    fn expiry_is_strictly_after_ttl() {
        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            subtotal: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            total: Decimal::ZERO,
            last_updated: now - Duration::minutes(61),
        };
        assert!(cart.is_expired(now, Duration::minutes(60)));

        let fresh = Cart {
            last_updated: now - Duration::minutes(60),
            ..cart
        };
        assert!(!fresh.is_expired(now, Duration::minutes(60)));
    }
}
