//! Public shop: ticket list, ticket detail, and the single-item purchase
//! path that drops one ticket option into the session cart.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::cart::store::CartStore;
use crate::flow::Screen;
use crate::forms::{clean_add_ticket, AddTicketInput};
use crate::handlers::portal::CartView;
use crate::models::{Sellable, Ticket, TicketOption};
use crate::session::CartSession;
use crate::utils::error::AppError;
use crate::utils::response::{error as error_response, redirect, success};
use crate::AppState;

const TICKET_COLUMNS: &str = "id, slug, title, description, available, created_at, updated_at";

const OPTION_COLUMNS: &str =
    "id, ticket_id, sku, name, price, available, created_at, updated_at";

/// Priced, available ticket options across all available tickets, projected
/// for the cart.
pub(crate) async fn ticket_option_sellables(pool: &PgPool) -> Result<Vec<Sellable>, sqlx::Error> {
    sqlx::query_as::<_, Sellable>(
        "SELECT o.sku, t.title || ' - ' || o.name AS description, o.price AS unit_price
         FROM ticket_options o
         JOIN tickets t ON t.id = o.ticket_id
         WHERE o.available AND t.available AND o.price IS NOT NULL
         ORDER BY t.title, o.name",
    )
    .fetch_all(pool)
    .await
}

/// Priced, available generic merchandise.
pub(crate) async fn product_sellables(pool: &PgPool) -> Result<Vec<Sellable>, sqlx::Error> {
    sqlx::query_as::<_, Sellable>(
        "SELECT sku, title AS description, price AS unit_price
         FROM product_variations
         WHERE available AND price IS NOT NULL
         ORDER BY title",
    )
    .fetch_all(pool)
    .await
}

pub(crate) fn by_sku(sellables: Vec<Sellable>) -> HashMap<String, Sellable> {
    sellables
        .into_iter()
        .map(|sellable| (sellable.sku.clone(), sellable))
        .collect()
}

pub async fn list_tickets(State(state): State<AppState>) -> Result<Response, AppError> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE available ORDER BY title"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(success(tickets, "Available tickets").into_response())
}

#[derive(Serialize)]
struct TicketDetail {
    #[serde(flatten)]
    ticket: Ticket,
    options: Vec<TicketOption>,
    /// Whether anything on this ticket can actually be bought.
    has_available_variations: bool,
}

async fn available_ticket(state: &AppState, slug: &str) -> Result<Ticket, AppError> {
    sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE slug = $1 AND available"
    ))
    .bind(slug)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Ticket '{slug}' was not found")))
}

pub async fn ticket_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let ticket = available_ticket(&state, &slug).await?;

    let options = sqlx::query_as::<_, TicketOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM ticket_options WHERE ticket_id = $1 ORDER BY name"
    ))
    .bind(ticket.id)
    .fetch_all(&state.pool)
    .await?;

    let has_available_variations = options
        .iter()
        .any(|option| option.available && option.has_price());

    let payload = TicketDetail {
        ticket,
        options,
        has_available_variations,
    };
    Ok(success(payload, "Ticket detail").into_response())
}

/// Single-item purchase path: one option, chosen quantity, straight into the
/// session cart, then off to the generic cart view.
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: CartSession,
    Path(slug): Path<String>,
    Json(input): Json<AddTicketInput>,
) -> Result<Response, AppError> {
    let ticket = available_ticket(&state, &slug).await?;

    let options = by_sku(
        sqlx::query_as::<_, Sellable>(
            "SELECT o.sku, t.title || ' - ' || o.name AS description, o.price AS unit_price
             FROM ticket_options o
             JOIN tickets t ON t.id = o.ticket_id
             WHERE o.ticket_id = $1 AND o.available AND t.available AND o.price IS NOT NULL",
        )
        .bind(ticket.id)
        .fetch_all(&state.pool)
        .await?,
    );

    let cleaned = match clean_add_ticket(&input, &options) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let response = error_response(
                "VALIDATION_ERROR",
                "Invalid selection",
                Some(errors.into_details(&input)),
                StatusCode::BAD_REQUEST,
            );
            return Ok((session.jar, response).into_response());
        }
    };

    let store = CartStore::new(&state.pool, state.config.cart_ttl);
    let cart = store.open(session.id).await?;
    let sellable = options
        .get(&cleaned.sku)
        .ok_or_else(|| AppError::InternalServerError("cleaned sku left the catalog".to_string()))?;
    store.add_item(cart.id, sellable, cleaned.quantity).await?;
    store.recalculate(cart.id, state.tax.as_ref()).await?;

    Ok((session.jar, redirect(Screen::Cart.path(), "Item added to cart")).into_response())
}

/// Generic cart view the single-item path redirects to.
pub async fn cart_view(
    State(state): State<AppState>,
    session: CartSession,
) -> Result<Response, AppError> {
    let store = CartStore::new(&state.pool, state.config.cart_ttl);
    let view = match store.live(session.id).await? {
        Some((cart, items)) => CartView::of(&cart, items),
        None => CartView::empty(),
    };

    Ok((session.jar, success(view, "Cart").into_response()).into_response())
}
