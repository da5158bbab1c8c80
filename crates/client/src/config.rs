//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKROOM_API_URL` - Catalog store base URL (default: `http://localhost:3000`)
//! - `STOCKROOM_API_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `STOCKROOM_SECRET_KEY` - Warehouseman secret key used to stamp edits
//! - `STOCKROOM_CLAMP_NEGATIVE_STOCK` - Floor stock adjustments at zero (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use secrecy::SecretString;
use stockroom_core::AdjustmentPolicy;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog client configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Catalog store base URL
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Secret key identifying the acting warehouseman
    pub secret_key: Option<SecretString>,
    /// How stock adjustments treat results below zero
    pub adjustment_policy: AdjustmentPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .field(
                "secret_key",
                &self.secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("adjustment_policy", &self.adjustment_policy)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with every other setting at its
    /// default.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secret_key: None,
            adjustment_policy: AdjustmentPolicy::Permissive,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("STOCKROOM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = parse_api_url(&raw_url)?;

        let timeout = match get("STOCKROOM_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "STOCKROOM_API_TIMEOUT_SECS".to_string(),
                        format!("expected a positive number of seconds, got {raw:?}"),
                    )
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let clamp = match get("STOCKROOM_CLAMP_NEGATIVE_STOCK") {
            Some(raw) => parse_bool("STOCKROOM_CLAMP_NEGATIVE_STOCK", &raw)?,
            None => false,
        };

        Ok(Self {
            api_url,
            timeout,
            secret_key: get("STOCKROOM_SECRET_KEY").map(SecretString::from),
            adjustment_policy: if clamp {
                AdjustmentPolicy::ClampAtZero
            } else {
                AdjustmentPolicy::Permissive
            },
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// The secret key, or an error naming the variable that should hold it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no key is configured.
    pub fn require_secret_key(&self) -> Result<&SecretString, ConfigError> {
        self.secret_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("STOCKROOM_SECRET_KEY".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STOCKROOM_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid(format!("{raw:?} is not a base URL")));
    }
    Ok(url)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}
