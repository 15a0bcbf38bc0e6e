//! Configuration management for the booking workflow.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Email-provider settings are optional on purpose: a missing setting
//! degrades the matching notification channel to a reported failure
//! instead of refusing to start.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Business identity used in notification templates
    pub business: BusinessConfig,
    /// Email delivery provider settings
    pub email: EmailConfig,
    /// Persistence for the long-lived rate-limit counter
    pub storage: StorageConfig,
    /// Dates the business is closed regardless of weekday
    pub blocked_dates: Vec<NaiveDate>,
}

/// Business identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Display name
    pub name: String,
    /// Contact address for replies
    pub email: String,
    /// Street address shown in confirmations
    pub address: String,
    /// Link to the location on a map
    pub maps_url: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "Maple Nail Studio".to_owned(),
            email: "hello@maplenails.example".to_owned(),
            address: "2110 Main Street, Montreal, QC".to_owned(),
            maps_url: "https://maps.example/maple-nail-studio".to_owned(),
        }
    }
}

/// Email delivery provider settings (`EmailJS`-compatible REST API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider endpoint
    pub api_url: String,
    /// Public API key sent with each request
    pub public_key: Option<String>,
    /// Provider-side service identifier
    pub service_id: Option<String>,
    /// Template for the customer confirmation
    pub customer_template_id: Option<String>,
    /// Template for the business alert
    pub admin_template_id: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.emailjs.com/api/v1.0/email/send".to_owned(),
            public_key: None,
            service_id: None,
            customer_template_id: None,
            admin_template_id: None,
        }
    }
}

impl EmailConfig {
    /// Whether enough is configured to attempt real deliveries.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.public_key.is_some() && self.service_id.is_some()
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File backing the long-lived submission counter
    pub rate_limit_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            rate_limit_path: PathBuf::from(".booking-flow/rate_limit.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = BusinessConfig::default();
        Self {
            business: BusinessConfig {
                name: env::var("BUSINESS_NAME").unwrap_or(defaults.name),
                email: env::var("BUSINESS_EMAIL").unwrap_or(defaults.email),
                address: env::var("BUSINESS_ADDRESS").unwrap_or(defaults.address),
                maps_url: env::var("BUSINESS_MAPS_URL").unwrap_or(defaults.maps_url),
            },
            email: EmailConfig {
                api_url: env::var("EMAILJS_API_URL")
                    .unwrap_or_else(|_| EmailConfig::default().api_url),
                public_key: env::var("EMAILJS_PUBLIC_KEY").ok(),
                service_id: env::var("EMAILJS_SERVICE_ID").ok(),
                customer_template_id: env::var("EMAILJS_CUSTOMER_TEMPLATE_ID").ok(),
                admin_template_id: env::var("EMAILJS_ADMIN_TEMPLATE_ID").ok(),
            },
            storage: StorageConfig {
                rate_limit_path: env::var("RATE_LIMIT_STORE_PATH")
                    .map_or_else(|_| StorageConfig::default().rate_limit_path, PathBuf::from),
            },
            blocked_dates: env::var("BLOCKED_DATES")
                .map(|raw| parse_blocked_dates(&raw))
                .unwrap_or_default(),
        }
    }
}

/// Parses a comma-separated `YYYY-MM-DD` list, skipping malformed entries
/// with a warning.
fn parse_blocked_dates(raw: &str) -> Vec<NaiveDate> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(error) => {
                tracing::warn!(entry = s, %error, "ignoring malformed blocked date");
                None
            }
        })
        .collect()
}
