//! Application configuration loaded from environment variables.

use common::Currency;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres connection string; in-memory store when unset
/// - `CURRENCY` — settlement currency code (default: `"EUR"`)
/// - `CHECKOUT_SUCCESS_URL` / `CHECKOUT_CANCEL_URL` — redirect targets
/// - `WEBHOOK_SECRET` — shared secret for webhook signature checks
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub currency: Currency,
    pub success_url: String,
    pub cancel_url: String,
    pub webhook_secret: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: std::env::var("DATABASE_URL").ok(),
            currency: std::env::var("CURRENCY")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.currency),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL").unwrap_or(defaults.success_url),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL").unwrap_or(defaults.cancel_url),
            webhook_secret: std::env::var("WEBHOOK_SECRET").unwrap_or(defaults.webhook_secret),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            currency: Currency::Eur,
            success_url: "http://localhost:3000/thankyou?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "http://localhost:3000/cart?cancelled=true".to_string(),
            webhook_secret: "whsec_dev_secret".to_string(),
        }
    }
}
