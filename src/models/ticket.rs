use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Admission product. Its purchasable variants are [`TicketOption`]s.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketOption {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub sku: String,
    pub name: String,
    /// Options without a price exist in the catalog but cannot be sold.
    pub price: Option<Decimal>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketOption {
    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

/// What the cart consumes: the projection of any sellable variant (ticket
/// option or generic product variation) onto sku / description / unit price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sellable {
    pub sku: String,
    pub description: String,
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpriced_option_has_no_price() {
        let option = TicketOption {
            id: Uuid::new_v4(),
            ticket_id: Uuid::new_v4(),
            sku: "WKND-STD".to_string(),
            name: "Weekend Standard".to_string(),
            price: None,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!option.has_price());
    }
}
