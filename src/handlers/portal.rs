//! Sales portal: the staff-assisted three-screen checkout wizard. Every
//! screen requires membership of the "Sales Portal Access" group; the
//! extractor rejects outsiders before any of this code runs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::{GroupRequired, SalesPortalAccess};
use crate::cart::store::CartStore;
use crate::flow::{
    decide_review, decide_selection, CartIntent, ReviewDecision, Screen, SelectionDecision,
};
use crate::forms::{clean_cart_lines, clean_quantity_lines, CartLineInput, QuantityInput};
use crate::handlers::tickets::{by_sku, product_sellables, ticket_option_sellables};
use crate::models::cart::has_items;
use crate::models::{Cart, CartItem, Sellable};
use crate::session::CartSession;
use crate::utils::error::AppError;
use crate::utils::response::{error as error_response, redirect, success};
use crate::AppState;

/// Cart screen payload: line items plus the denormalized totals.
#[derive(Serialize)]
pub(crate) struct CartView {
    items: Vec<CartItem>,
    subtotal: Decimal,
    tax_total: Decimal,
    total: Decimal,
}

impl CartView {
    pub(crate) fn of(cart: &Cart, items: Vec<CartItem>) -> Self {
        Self {
            items,
            subtotal: cart.subtotal,
            tax_total: cart.tax_total,
            total: cart.total,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

pub async fn logon(_operator: GroupRequired<SalesPortalAccess>) -> Response {
    redirect(Screen::PortalItems.path(), "Logged on to sales portal")
}

#[derive(Serialize)]
struct ItemSelectionScreen {
    ticket_options: Vec<Sellable>,
    products: Vec<Sellable>,
}

pub async fn items_screen(
    _operator: GroupRequired<SalesPortalAccess>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let screen = ItemSelectionScreen {
        ticket_options: ticket_option_sellables(&state.pool).await?,
        products: product_sellables(&state.pool).await?,
    };
    Ok(success(screen, "Item selection").into_response())
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ItemSelectionInput {
    #[serde(default)]
    pub ticket_options: Vec<QuantityInput>,
    #[serde(default)]
    pub products: Vec<QuantityInput>,
    /// Shortcut straight to the cart screen, skipping any mutation.
    #[serde(default)]
    pub go_to_cart: bool,
}

pub async fn items_submit(
    _operator: GroupRequired<SalesPortalAccess>,
    State(state): State<AppState>,
    session: CartSession,
    Json(input): Json<ItemSelectionInput>,
) -> Result<Response, AppError> {
    let ticket_catalog = by_sku(ticket_option_sellables(&state.pool).await?);
    let product_catalog = by_sku(product_sellables(&state.pool).await?);

    let tickets = clean_quantity_lines("ticket_options", &input.ticket_options, &ticket_catalog);
    let products = clean_quantity_lines("products", &input.products, &product_catalog);

    match decide_selection(input.go_to_cart, tickets, products) {
        SelectionDecision::GoToCart => {
            let response = redirect(Screen::PortalCart.path(), "Cart");
            Ok((session.jar, response).into_response())
        }
        SelectionDecision::AddToCart(lines) => {
            let store = CartStore::new(&state.pool, state.config.cart_ttl);
            let cart = store.open(session.id).await?;
            for line in &lines {
                let sellable = ticket_catalog
                    .get(&line.sku)
                    .or_else(|| product_catalog.get(&line.sku))
                    .ok_or_else(|| {
                        AppError::InternalServerError("cleaned sku left the catalog".to_string())
                    })?;
                store.add_item(cart.id, sellable, line.quantity).await?;
            }
            store.recalculate(cart.id, state.tax.as_ref()).await?;

            let response = redirect(Screen::PortalCart.path(), "Items added to cart");
            Ok((session.jar, response).into_response())
        }
        SelectionDecision::Rejected { errors, message } => {
            let response = error_response(
                "VALIDATION_ERROR",
                message,
                Some(errors.into_details(&input)),
                StatusCode::BAD_REQUEST,
            );
            Ok((session.jar, response).into_response())
        }
    }
}

pub async fn cart_screen(
    _operator: GroupRequired<SalesPortalAccess>,
    State(state): State<AppState>,
    session: CartSession,
) -> Result<Response, AppError> {
    let store = CartStore::new(&state.pool, state.config.cart_ttl);
    let view = match store.live(session.id).await? {
        Some((cart, items)) => CartView::of(&cart, items),
        None => CartView::empty(),
    };
    Ok((session.jar, success(view, "Cart review").into_response()).into_response())
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CartReviewInput {
    #[serde(default)]
    pub items: Vec<CartLineInput>,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub back: bool,
    #[serde(default)]
    pub next: bool,
}

pub async fn cart_submit(
    _operator: GroupRequired<SalesPortalAccess>,
    State(state): State<AppState>,
    session: CartSession,
    Json(input): Json<CartReviewInput>,
) -> Result<Response, AppError> {
    let intent = CartIntent::parse(input.update, input.back, input.next)
        .ok_or_else(|| AppError::NotImplemented("Post type invalid".to_string()))?;

    let store = CartStore::new(&state.pool, state.config.cart_ttl);
    let (cart, items) = match store.live(session.id).await? {
        Some(live) => live,
        // Cart gone entirely: same timed-out report as an emptied one.
        None => return Err(AppError::SessionTimedOut),
    };

    let existing = items
        .iter()
        .map(|item| (item.id, item.clone()))
        .collect();
    let lines = clean_cart_lines(&input.items, &existing);

    match decide_review(has_items(&items), lines, intent) {
        ReviewDecision::TimedOut => Err(AppError::SessionTimedOut),
        ReviewDecision::Persist { lines, destination } => {
            store.apply_lines(cart.id, &lines).await?;
            store.recalculate(cart.id, state.tax.as_ref()).await?;
            let response = redirect(destination.path(), "Cart updated");
            Ok((session.jar, response).into_response())
        }
        ReviewDecision::Invalid(errors) => {
            let response = error_response(
                "VALIDATION_ERROR",
                "Invalid update",
                Some(errors.into_details(&input)),
                StatusCode::BAD_REQUEST,
            );
            Ok((session.jar, response).into_response())
        }
    }
}

/// Terminal screen of the wizard: display-only totals. Payment and order
/// finalization happen outside this service.
pub async fn checkout_screen(
    _operator: GroupRequired<SalesPortalAccess>,
    State(state): State<AppState>,
    session: CartSession,
) -> Result<Response, AppError> {
    let store = CartStore::new(&state.pool, state.config.cart_ttl);
    let view = match store.live(session.id).await? {
        Some((cart, items)) => CartView::of(&cart, items),
        None => CartView::empty(),
    };
    Ok((session.jar, success(view, "Checkout").into_response()).into_response())
}
