//! Sales-portal wizard decisions, kept free of IO so each branch of the
//! three-screen flow (item selection, cart review, checkout) is testable on
//! its own.

use crate::forms::{total_quantity, CleanedCartLine, CleanedLine, FormErrors};

/// Client-facing screens the flow can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Cart,
    PortalItems,
    PortalCart,
    PortalCheckout,
}

impl Screen {
    pub fn path(self) -> &'static str {
        match self {
            Screen::Cart => "/cart",
            Screen::PortalItems => "/portal/items",
            Screen::PortalCart => "/portal/cart",
            Screen::PortalCheckout => "/portal/checkout",
        }
    }
}

/// Submitted intent on the cart-review screen. Matched in the same order as
/// the original button handling: update, then back, then next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartIntent {
    Update,
    Back,
    Next,
}

impl CartIntent {
    pub fn parse(update: bool, back: bool, next: bool) -> Option<CartIntent> {
        if update {
            Some(CartIntent::Update)
        } else if back {
            Some(CartIntent::Back)
        } else if next {
            Some(CartIntent::Next)
        } else {
            None
        }
    }

    pub fn destination(self) -> Screen {
        match self {
            CartIntent::Update => Screen::PortalCart,
            CartIntent::Back => Screen::PortalItems,
            CartIntent::Next => Screen::PortalCheckout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionDecision {
    /// Jump straight to cart review. Nothing is validated, nothing is added.
    GoToCart,
    /// Add every requested line (quantity > 0) and move on to cart review.
    AddToCart(Vec<CleanedLine>),
    /// Re-render the selection screen; the cart must not be touched.
    Rejected {
        errors: FormErrors,
        message: &'static str,
    },
}

/// Item-selection submit. The go-to-cart shortcut wins over everything else;
/// otherwise both formsets must clean successfully and the combined requested
/// quantity must be positive before anything reaches the cart.
pub fn decide_selection(
    go_to_cart: bool,
    ticket_options: Result<Vec<CleanedLine>, FormErrors>,
    products: Result<Vec<CleanedLine>, FormErrors>,
) -> SelectionDecision {
    if go_to_cart {
        return SelectionDecision::GoToCart;
    }
    match (ticket_options, products) {
        (Ok(tickets), Ok(products)) => {
            if total_quantity(&[&tickets, &products]) == 0 {
                return SelectionDecision::Rejected {
                    errors: FormErrors::default(),
                    message: "Invalid quantity.",
                };
            }
            let lines = tickets
                .into_iter()
                .chain(products)
                .filter(|line| line.quantity > 0)
                .collect();
            SelectionDecision::AddToCart(lines)
        }
        (tickets, products) => {
            let errors = tickets
                .err()
                .unwrap_or_default()
                .merge(products.err().unwrap_or_default());
            SelectionDecision::Rejected {
                errors,
                message: "Invalid selection",
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// The cart vanished or expired under the user. Reported uniformly, no
    /// matter which intent was submitted or whether the formset was valid.
    TimedOut,
    /// Persist the cleaned edits, recalculate, then redirect.
    Persist {
        lines: Vec<CleanedCartLine>,
        destination: Screen,
    },
    /// Re-render the review screen with the formset errors.
    Invalid(FormErrors),
}

/// Cart-review submit. Emptiness is checked before anything else.
pub fn decide_review(
    cart_has_items: bool,
    lines: Result<Vec<CleanedCartLine>, FormErrors>,
    intent: CartIntent,
) -> ReviewDecision {
    if !cart_has_items {
        return ReviewDecision::TimedOut;
    }
    match lines {
        Ok(lines) => ReviewDecision::Persist {
            lines,
            destination: intent.destination(),
        },
        Err(errors) => ReviewDecision::Invalid(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn line(sku: &str, quantity: u32) -> CleanedLine {
        CleanedLine {
            sku: sku.to_string(),
            quantity,
        }
    }

    fn cart_line(quantity: u32) -> CleanedCartLine {
        CleanedCartLine {
            id: Uuid::new_v4(),
            quantity,
            remove: false,
        }
    }

    fn some_errors() -> FormErrors {
        let mut errors = FormErrors::default();
        errors.push("products", 0, "quantity", "'x' is not a valid quantity");
        errors
    }

    #[test]
    fn go_to_cart_shortcut_skips_validation_and_mutation() {
        // Even invalid input and positive quantities do not matter here.
        let decision = decide_selection(true, Err(some_errors()), Ok(vec![line("WKND", 2)]));
        assert_eq!(decision, SelectionDecision::GoToCart);
    }

    #[test]
    fn all_zero_quantities_do_not_reach_the_cart() {
        let decision = decide_selection(
            false,
            Ok(vec![line("WKND", 0), line("DAY", 0)]),
            Ok(vec![line("MUG", 0)]),
        );
        match decision {
            SelectionDecision::Rejected { message, errors } => {
                assert_eq!(message, "Invalid quantity.");
                assert!(errors.is_empty());
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn single_valid_line_is_added_and_flow_advances() {
        let decision =
            decide_selection(false, Ok(vec![line("WKND", 3), line("DAY", 0)]), Ok(vec![]));
        assert_eq!(
            decision,
            SelectionDecision::AddToCart(vec![line("WKND", 3)])
        );
    }

    #[test]
    fn invalid_formset_blocks_even_with_positive_quantities() {
        let decision = decide_selection(false, Ok(vec![line("WKND", 2)]), Err(some_errors()));
        match decision {
            SelectionDecision::Rejected { errors, .. } => assert!(!errors.is_empty()),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn intent_priority_is_update_back_next() {
        assert_eq!(
            CartIntent::parse(true, true, true),
            Some(CartIntent::Update)
        );
        assert_eq!(CartIntent::parse(false, true, true), Some(CartIntent::Back));
        assert_eq!(CartIntent::parse(false, false, true), Some(CartIntent::Next));
    }

    #[test]
    fn missing_intent_is_not_a_silent_no_op() {
        assert_eq!(CartIntent::parse(false, false, false), None);
    }

    #[test]
    fn empty_cart_times_out_even_with_a_valid_formset() {
        let decision = decide_review(false, Ok(vec![cart_line(2)]), CartIntent::Update);
        assert_eq!(decision, ReviewDecision::TimedOut);
    }

    #[test]
    fn empty_cart_times_out_regardless_of_intent() {
        for intent in [CartIntent::Update, CartIntent::Back, CartIntent::Next] {
            assert_eq!(
                decide_review(false, Ok(vec![]), intent),
                ReviewDecision::TimedOut
            );
        }
    }

    #[test]
    fn next_with_valid_cart_redirects_to_checkout() {
        let lines = vec![cart_line(1)];
        let decision = decide_review(true, Ok(lines.clone()), CartIntent::Next);
        assert_eq!(
            decision,
            ReviewDecision::Persist {
                lines,
                destination: Screen::PortalCheckout,
            }
        );
    }

    #[test]
    fn back_returns_to_item_selection() {
        let decision = decide_review(true, Ok(vec![]), CartIntent::Back);
        match decision {
            ReviewDecision::Persist { destination, .. } => {
                assert_eq!(destination, Screen::PortalItems);
            }
            other => panic!("expected persist, got {other:?}"),
        }
    }

    #[test]
    fn invalid_formset_re_renders_review() {
        let decision = decide_review(true, Err(some_errors()), CartIntent::Update);
        assert!(matches!(decision, ReviewDecision::Invalid(_)));
    }
}
