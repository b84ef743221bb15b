//! Quantity form and formset cleaning for the shop and the sales portal.
//!
//! Submitted quantities arrive as raw strings, exactly as a browser form
//! would post them. Cleaning either produces structured per-line values or
//! collects field-level errors; flow logic branches on that result and never
//! probes half-validated input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{CartItem, Sellable};

/// One editable quantity row as submitted from an item-selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityInput {
    pub sku: String,
    #[serde(default)]
    pub quantity: String,
}

/// One editable row of the cart-review formset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    pub id: Uuid,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub remove: bool,
}

/// Single-item purchase form on the ticket detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTicketInput {
    pub sku: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedLine {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedCartLine {
    pub id: Uuid,
    pub quantity: u32,
    pub remove: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Formset prefix: "ticket_options", "products", "items".
    pub prefix: &'static str,
    pub index: usize,
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, prefix: &'static str, index: usize, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            prefix,
            index,
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(mut self, other: FormErrors) -> FormErrors {
        self.errors.extend(other.errors);
        self
    }

    /// Error payload for the response envelope, echoing the submitted input
    /// so the client can re-render the screen with prior values preserved.
    pub fn into_details<T: Serialize>(self, submitted: &T) -> Value {
        json!({
            "errors": self.errors,
            "submitted": submitted,
        })
    }
}

/// Upper bound on a single requested quantity. Keeps every cleaned value
/// inside the range of the store's integer quantity column.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// An empty quantity field means "none requested", as on a blank formset row.
fn parse_quantity(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let quantity = trimmed
        .parse::<u32>()
        .map_err(|_| format!("'{trimmed}' is not a valid quantity"))?;
    if quantity > MAX_LINE_QUANTITY {
        return Err(format!("quantity may not exceed {MAX_LINE_QUANTITY}"));
    }
    Ok(quantity)
}

/// Cleans an item-selection formset against the catalog it was rendered
/// from. Unknown or unavailable skus are rejected per line.
pub fn clean_quantity_lines(
    prefix: &'static str,
    lines: &[QuantityInput],
    catalog: &HashMap<String, Sellable>,
) -> Result<Vec<CleanedLine>, FormErrors> {
    let mut cleaned = Vec::with_capacity(lines.len());
    let mut errors = FormErrors::default();

    for (index, line) in lines.iter().enumerate() {
        if !catalog.contains_key(&line.sku) {
            errors.push(prefix, index, "sku", format!("unknown item '{}'", line.sku));
            continue;
        }
        match parse_quantity(&line.quantity) {
            Ok(quantity) => cleaned.push(CleanedLine {
                sku: line.sku.clone(),
                quantity,
            }),
            Err(message) => errors.push(prefix, index, "quantity", message),
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

pub fn total_quantity(cleaned_sets: &[&[CleanedLine]]) -> u32 {
    cleaned_sets
        .iter()
        .flat_map(|set| set.iter())
        .map(|line| line.quantity)
        .sum()
}

/// Cleans the cart-review formset against the line items actually in the
/// cart. A row whose id no longer matches a cart item is an error, not a
/// silent skip.
pub fn clean_cart_lines(
    lines: &[CartLineInput],
    existing: &HashMap<Uuid, CartItem>,
) -> Result<Vec<CleanedCartLine>, FormErrors> {
    let mut cleaned = Vec::with_capacity(lines.len());
    let mut errors = FormErrors::default();

    for (index, line) in lines.iter().enumerate() {
        if !existing.contains_key(&line.id) {
            errors.push("items", index, "id", "item is no longer in the cart");
            continue;
        }
        match parse_quantity(&line.quantity) {
            Ok(quantity) => cleaned.push(CleanedCartLine {
                id: line.id,
                quantity,
                remove: line.remove,
            }),
            Err(message) => errors.push("items", index, "quantity", message),
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

/// Cleans the single-item purchase form. Unlike the portal formsets, a
/// quantity of zero is itself an error here.
pub fn clean_add_ticket(
    input: &AddTicketInput,
    options: &HashMap<String, Sellable>,
) -> Result<CleanedLine, FormErrors> {
    let mut errors = FormErrors::default();

    if !options.contains_key(&input.sku) {
        errors.push("add", 0, "sku", format!("unknown option '{}'", input.sku));
    }

    match parse_quantity(&input.quantity) {
        Ok(0) => errors.push("add", 0, "quantity", "quantity must be at least 1"),
        Ok(quantity) => {
            if errors.is_empty() {
                return Ok(CleanedLine {
                    sku: input.sku.clone(),
                    quantity,
                });
            }
        }
        Err(message) => errors.push("add", 0, "quantity", message),
    }

    Err(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn catalog(skus: &[&str]) -> HashMap<String, Sellable> {
        skus.iter()
            .map(|sku| {
                (
                    sku.to_string(),
                    Sellable {
                        sku: sku.to_string(),
                        description: format!("Item {sku}"),
                        unit_price: Decimal::new(2500, 2),
                    },
                )
            })
            .collect()
    }

    fn line(sku: &str, quantity: &str) -> QuantityInput {
        QuantityInput {
            sku: sku.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn valid_lines_clean_to_numbers() {
        let cleaned = clean_quantity_lines(
            "ticket_options",
            &[line("WKND", "3"), line("DAY", "0"), line("VIP", "")],
            &catalog(&["WKND", "DAY", "VIP"]),
        )
        .unwrap();

        assert_eq!(
            cleaned,
            vec![
                CleanedLine { sku: "WKND".into(), quantity: 3 },
                CleanedLine { sku: "DAY".into(), quantity: 0 },
                CleanedLine { sku: "VIP".into(), quantity: 0 },
            ]
        );
    }

    #[test]
    fn non_numeric_quantity_is_a_field_error() {
        let errors = clean_quantity_lines(
            "products",
            &[line("MUG", "two")],
            &catalog(&["MUG"]),
        )
        .unwrap_err();

        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "quantity");
        assert_eq!(errors.errors[0].prefix, "products");
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let errors =
            clean_quantity_lines("products", &[line("MUG", "-1")], &catalog(&["MUG"]))
                .unwrap_err();
        assert_eq!(errors.errors[0].field, "quantity");
    }

    #[test]
    fn quantity_above_the_line_maximum_is_a_field_error() {
        let catalog = catalog(&["MUG"]);

        // Past i32 range: must fail cleaning, never reach a store bind.
        let errors =
            clean_quantity_lines("products", &[line("MUG", "2147483648")], &catalog)
                .unwrap_err();
        assert_eq!(errors.errors[0].field, "quantity");

        let errors =
            clean_quantity_lines("products", &[line("MUG", "10000")], &catalog).unwrap_err();
        assert_eq!(errors.errors[0].field, "quantity");

        let max = MAX_LINE_QUANTITY.to_string();
        let cleaned = clean_quantity_lines("products", &[line("MUG", &max)], &catalog).unwrap();
        assert_eq!(cleaned[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn unknown_sku_is_rejected() {
        let errors =
            clean_quantity_lines("products", &[line("GONE", "1")], &catalog(&["MUG"]))
                .unwrap_err();
        assert_eq!(errors.errors[0].field, "sku");
    }

    #[test]
    fn total_quantity_spans_both_formsets() {
        let tickets = vec![CleanedLine { sku: "WKND".into(), quantity: 2 }];
        let products = vec![
            CleanedLine { sku: "MUG".into(), quantity: 0 },
            CleanedLine { sku: "TEE".into(), quantity: 1 },
        ];
        assert_eq!(total_quantity(&[&tickets, &products]), 3);
    }

    #[test]
    fn cart_line_for_missing_item_is_rejected() {
        let input = CartLineInput {
            id: Uuid::new_v4(),
            quantity: "1".into(),
            remove: false,
        };
        let errors = clean_cart_lines(&[input], &HashMap::new()).unwrap_err();
        assert_eq!(errors.errors[0].field, "id");
    }

    #[test]
    fn add_ticket_requires_positive_quantity() {
        let options = catalog(&["WKND"]);

        let zero = AddTicketInput { sku: "WKND".into(), quantity: "0".into() };
        assert!(clean_add_ticket(&zero, &options).is_err());

        let three = AddTicketInput { sku: "WKND".into(), quantity: "3".into() };
        let cleaned = clean_add_ticket(&three, &options).unwrap();
        assert_eq!(cleaned.quantity, 3);
    }
}
