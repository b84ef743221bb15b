use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{admin, conventions, health_check, portal, tickets};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        // eventbro: public catalog and registration
        .route("/conventions", get(conventions::list_conventions))
        .route("/event-types", get(conventions::list_event_types))
        .route("/conventions/:id/events", get(conventions::list_events))
        .route("/conventions/:id/sponsors", get(conventions::list_sponsors))
        .route("/events/:id/register", post(conventions::register))
        // salesbro: public shop
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/:slug", get(tickets::ticket_detail))
        .route("/tickets/:slug/add", post(tickets::add_to_cart))
        .route("/cart", get(tickets::cart_view))
        // salesbro: sales portal wizard
        .route("/portal/logon", get(portal::logon))
        .route(
            "/portal/items",
            get(portal::items_screen).post(portal::items_submit),
        )
        .route(
            "/portal/cart",
            get(portal::cart_screen).post(portal::cart_submit),
        )
        .route("/portal/checkout", get(portal::checkout_screen))
        // admin
        .route("/admin/schema", get(admin::schema))
        .route("/admin/conventions", post(admin::create_convention))
        .route("/admin/conventions/:id", patch(admin::update_convention))
        .route("/admin/events", post(admin::create_event))
        .route("/admin/events/:id", patch(admin::update_event))
        .route("/admin/events/:id/image", put(admin::upload_event_image))
        .route("/admin/registrations/:id", patch(admin::update_registration))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state);

    apply_security_headers(router)
}
