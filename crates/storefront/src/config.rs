//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_CART_KEY` - Storage key holding the cart (default: `ts_cart`)
//! - `STOREFRONT_STORAGE_DIR` - Directory for the file-backed store (default: `.tech-shop`)
//! - `STOREFRONT_PLACEHOLDER_IMAGE` - Image used when a product has none (default: `./placeholder.png`)
//! - `STOREFRONT_SEARCH_MAX_RESULTS` - Suggestion cap (default: 12)
//! - `STOREFRONT_SEARCH_BROWSE_LIMIT` - Suggestions shown for an empty query (default: 8)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0 to 1.0 (default: 1.0)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::storage;

pub const DEFAULT_CART_KEY: &str = "ts_cart";
pub const DEFAULT_STORAGE_DIR: &str = ".tech-shop";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "./placeholder.png";
pub const DEFAULT_MAX_RESULTS: usize = 12;
pub const DEFAULT_BROWSE_LIMIT: usize = 8;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Key under which the cart collection is persisted
    pub cart_key: String,
    /// Directory used by [`storage::FileStorage`]
    pub storage_dir: PathBuf,
    /// Image reference for products without one
    pub placeholder_image: String,
    /// Search suggestion limits
    pub search: SearchConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
}

/// Search suggestion limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of suggestions for a non-empty query
    pub max_results: usize,
    /// Number of catalog entries shown when the query is empty
    pub browse_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            browse_limit: DEFAULT_BROWSE_LIMIT,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            search: SearchConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl StorefrontConfig {
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

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cart_key = get_or_default(&lookup, "STOREFRONT_CART_KEY", DEFAULT_CART_KEY);
        storage::validate_key(&cart_key).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_CART_KEY".to_string(), e.to_string())
        })?;

        let storage_dir = PathBuf::from(get_or_default(
            &lookup,
            "STOREFRONT_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let placeholder_image = get_or_default(
            &lookup,
            "STOREFRONT_PLACEHOLDER_IMAGE",
            DEFAULT_PLACEHOLDER_IMAGE,
        );

        let search = SearchConfig::from_lookup(&lookup)?;

        let sentry_dsn = get_optional(&lookup, "SENTRY_DSN");
        let sentry_environment = get_optional(&lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate: f32 = parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sentry_sample_rate})"),
            ));
        }

        Ok(Self {
            cart_key,
            storage_dir,
            placeholder_image,
            search,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }
}

impl SearchConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_results =
            parse_or_default(lookup, "STOREFRONT_SEARCH_MAX_RESULTS", DEFAULT_MAX_RESULTS)?;
        let browse_limit =
            parse_or_default(lookup, "STOREFRONT_SEARCH_BROWSE_LIMIT", DEFAULT_BROWSE_LIMIT)?;

        if max_results == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SEARCH_MAX_RESULTS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        if browse_limit == 0 || browse_limit > max_results {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SEARCH_BROWSE_LIMIT".to_string(),
                format!("must be between 1 and {max_results} (got {browse_limit})"),
            ));
        }

        Ok(Self {
            max_results,
            browse_limit,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as absent.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to a default when it is unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
