use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use rust_decimal::Decimal;

pub mod http;

pub use http::{apply_security_headers, create_cors_layer};

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Root directory for uploaded media (event thumbnails, sponsor logos).
    pub media_dir: PathBuf,
    /// Flat sales-tax rate applied by the portal's tax handler, e.g. "0.05".
    pub sales_tax_rate: Decimal,
    /// Idle time after which a session cart counts as timed out.
    pub cart_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let cart_ttl_minutes: i64 = env::var("CART_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/conbro".to_string()),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            sales_tax_rate: env::var("SALES_TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Decimal::ZERO),
            cart_ttl: Duration::minutes(cart_ttl_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane_without_env() {
        std::env::remove_var("PORT");
        std::env::remove_var("SALES_TAX_RATE");
        std::env::remove_var("CART_TTL_MINUTES");

        let config = Config::from_env();
        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.sales_tax_rate, Decimal::ZERO);
        assert_eq!(config.cart_ttl, Duration::minutes(60));
    }
}
