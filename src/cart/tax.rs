use rust_decimal::Decimal;

/// Opaque tax collaborator, invoked after item additions and cart edits.
/// Real tax computation lives outside this service.
pub trait TaxHandler: Send + Sync {
    fn tax_for(&self, subtotal: Decimal) -> Decimal;
}

/// Flat-rate stand-in configured from `SALES_TAX_RATE`.
pub struct FlatRateTax {
    rate: Decimal,
}

impl FlatRateTax {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl TaxHandler for FlatRateTax {
    fn tax_for(&self, subtotal: Decimal) -> Decimal {
        (subtotal * self.rate).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_rate_rounds_to_cents() {
        let tax = FlatRateTax::new(Decimal::new(7, 2)); // 7%
        // 33.33 * 0.07 = 2.3331 -> 2.33
        assert_eq!(tax.tax_for(Decimal::new(3333, 2)), Decimal::new(233, 2));
    }

    #[test]
    fn zero_rate_charges_nothing() {
        let tax = FlatRateTax::new(Decimal::ZERO);
        assert_eq!(tax.tax_for(Decimal::new(9999, 2)), Decimal::ZERO);
    }
}
