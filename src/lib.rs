use std::sync::Arc;

use sqlx::PgPool;

use crate::cart::tax::TaxHandler;
use crate::config::Config;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod config;
pub mod flow;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod thumbs;
pub mod utils;

/// Shared application state handed to every handler and extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub tax: Arc<dyn TaxHandler>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let tax = Arc::new(cart::tax::FlatRateTax::new(config.sales_tax_rate));
        Self {
            pool,
            config: Arc::new(config),
            tax,
        }
    }
}
