//! Application configuration loaded from environment variables.

use common::Money;
use orders::DiscountConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DISCOUNT_PREMIUM_RATE_BP` — premium tier rate in basis points
///   (default: `1000`)
/// - `DISCOUNT_VOLUME_THRESHOLD_CENTS` — subtotal a volume discount must
///   exceed, in cents (default: `50000`)
/// - `DISCOUNT_VOLUME_RATE_BP` — volume rate in basis points (default: `500`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub premium_rate_bp: i64,
    pub volume_threshold_cents: i64,
    pub volume_rate_bp: i64,
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = DiscountConfig::default();
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            premium_rate_bp: env_i64("DISCOUNT_PREMIUM_RATE_BP", defaults.premium_rate_bp),
            volume_threshold_cents: env_i64(
                "DISCOUNT_VOLUME_THRESHOLD_CENTS",
                defaults.volume_threshold.cents(),
            ),
            volume_rate_bp: env_i64("DISCOUNT_VOLUME_RATE_BP", defaults.volume_rate_bp),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the discount policy configuration.
    pub fn discount_config(&self) -> DiscountConfig {
        DiscountConfig {
            premium_rate_bp: self.premium_rate_bp,
            volume_threshold: Money::from_cents(self.volume_threshold_cents),
            volume_rate_bp: self.volume_rate_bp,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let defaults = DiscountConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            premium_rate_bp: defaults.premium_rate_bp,
            volume_threshold_cents: defaults.volume_threshold.cents(),
            volume_rate_bp: defaults.volume_rate_bp,
        }
    }
}
