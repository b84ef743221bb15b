pub mod store;
pub mod tax;

use rust_decimal::Decimal;

use crate::models::cart::{subtotal_of, CartItem};
use tax::TaxHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

/// Recomputes cart totals from its line items. The tax handler is consulted
/// exactly once per recalculation.
pub fn compute_totals(items: &[CartItem], tax: &dyn TaxHandler) -> Totals {
    let subtotal = subtotal_of(items);
    let tax_total = tax.tax_for(subtotal);
    Totals {
        subtotal,
        tax_total,
        total: subtotal + tax_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingTax(AtomicUsize);

    impl TaxHandler for CountingTax {
        fn tax_for(&self, subtotal: Decimal) -> Decimal {
            self.0.fetch_add(1, Ordering::SeqCst);
            subtotal / Decimal::from(10)
        }
    }

    fn item(unit_cents: i64, quantity: i32) -> CartItem {
        let unit_price = Decimal::new(unit_cents, 2);
        CartItem {
            id: Uuid::new_v4(),
            cart_id: Uuid::new_v4(),
            sku: "SKU".to_string(),
            description: "Item".to_string(),
            unit_price,
            quantity,
            total_price: CartItem::line_total(unit_price, quantity),
        }
    }

    #[test]
    fn totals_add_tax_to_subtotal() {
        let tax = CountingTax(AtomicUsize::new(0));
        let totals = compute_totals(&[item(1000, 2), item(500, 1)], &tax);

        assert_eq!(totals.subtotal, Decimal::new(2500, 2));
        assert_eq!(totals.tax_total, Decimal::new(250, 2));
        assert_eq!(totals.total, Decimal::new(2750, 2));
    }

    #[test]
    fn tax_handler_is_consulted_exactly_once() {
        let tax = CountingTax(AtomicUsize::new(0));
        compute_totals(&[item(1000, 1)], &tax);
        assert_eq!(tax.0.load(Ordering::SeqCst), 1);
    }
}
