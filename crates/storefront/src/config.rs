//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `MMS_DATA_DIR` - Directory of the persisted store (default: .mms)
//! - `MMS_CATALOG_PATH` - YAML catalog replacing the bundled one
//! - `MMS_CREDENTIALS_PATH` - YAML credential table replacing the bundled one
//! - `MMS_ADDRESSES_PATH` - YAML address list replacing the bundled one
//! - `MMS_LOGIN_DELAY_MS` - Simulated login latency (default: 800)
//! - `MMS_CHECKOUT_DELAY_MS` - Simulated checkout latency (default: 1500)
//! - `MMS_QUOTE_DELAY_MS` - Simulated quote latency (default: 1500)
//! - `MMS_TAX_RATE` - Sales tax rate (default: 0.07)
//! - `MMS_PRICE_CEILING` - Upper bound of the search price range (default: 150)
//! - `MMS_QUOTE_INBOX` - Address quote requests go to (default: mmsinfo@mms.ca)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use mass_market_core::Email;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Simulated backend delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub login: Duration,
    pub checkout: Duration,
    pub quote: Duration,
}

impl SimulatedLatency {
    /// No delays. Used by tests and scripted sessions.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            login: Duration::ZERO,
            checkout: Duration::ZERO,
            quote: Duration::ZERO,
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(800),
            checkout: Duration::from_millis(1500),
            quote: Duration::from_millis(1500),
        }
    }
}

/// Where fixtures come from when not using the bundled ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixturePaths {
    pub catalog: Option<PathBuf>,
    pub credentials: Option<PathBuf>,
    pub addresses: Option<PathBuf>,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted store
    pub data_dir: PathBuf,
    /// Fixture overrides
    pub fixtures: FixturePaths,
    /// Simulated backend delays
    pub latency: SimulatedLatency,
    /// Sales tax rate applied to cart totals
    pub tax_rate: Decimal,
    /// Upper bound of the default search price range
    pub price_ceiling: Decimal,
    /// Sales inbox for quote requests
    pub quote_inbox: Email,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let data_dir = PathBuf::from(env.or_default("MMS_DATA_DIR", ".mms"));
        let fixtures = FixturePaths {
            catalog: env.optional("MMS_CATALOG_PATH").map(PathBuf::from),
            credentials: env.optional("MMS_CREDENTIALS_PATH").map(PathBuf::from),
            addresses: env.optional("MMS_ADDRESSES_PATH").map(PathBuf::from),
        };
        let latency = SimulatedLatency {
            login: Duration::from_millis(env.parsed("MMS_LOGIN_DELAY_MS", "800")?),
            checkout: Duration::from_millis(env.parsed("MMS_CHECKOUT_DELAY_MS", "1500")?),
            quote: Duration::from_millis(env.parsed("MMS_QUOTE_DELAY_MS", "1500")?),
        };
        let tax_rate: Decimal = env.parsed("MMS_TAX_RATE", "0.07")?;
        if tax_rate.is_sign_negative() {
            return Err(invalid("MMS_TAX_RATE", "must not be negative"));
        }
        let price_ceiling: Decimal = env.parsed("MMS_PRICE_CEILING", "150")?;
        if price_ceiling.is_sign_negative() {
            return Err(invalid("MMS_PRICE_CEILING", "must not be negative"));
        }
        let quote_inbox: Email = env.parsed("MMS_QUOTE_INBOX", "mmsinfo@mms.ca")?;

        Ok(Self {
            data_dir,
            fixtures,
            latency,
            tax_rate,
            price_ceiling,
            quote_inbox,
        })
    }

    /// This configuration with all simulated delays removed.
    #[must_use]
    pub fn without_latency(mut self) -> Self {
        self.latency = SimulatedLatency::none();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(key, e))
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".mms"));
        assert_eq!(config.fixtures, FixturePaths::default());
        assert_eq!(config.latency, SimulatedLatency::default());
        assert_eq!(config.tax_rate, Decimal::new(7, 2));
        assert_eq!(config.price_ceiling, Decimal::from(150));
        assert_eq!(config.quote_inbox.as_str(), "mmsinfo@mms.ca");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MMS_DATA_DIR", "/tmp/mms"),
            ("MMS_CATALOG_PATH", "catalog.yaml"),
            ("MMS_LOGIN_DELAY_MS", "0"),
            ("MMS_TAX_RATE", "0.13"),
            ("MMS_QUOTE_INBOX", "sales@mms.ca"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mms"));
        assert_eq!(config.fixtures.catalog, Some(PathBuf::from("catalog.yaml")));
        assert_eq!(config.fixtures.credentials, None);
        assert_eq!(config.latency.login, Duration::ZERO);
        assert_eq!(config.latency.checkout, Duration::from_millis(1500));
        assert_eq!(config.tax_rate, Decimal::new(13, 2));
        assert_eq!(config.quote_inbox.as_str(), "sales@mms.ca");
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("MMS_DATA_DIR", " "), ("MMS_TAX_RATE", "")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".mms"));
        assert_eq!(config.tax_rate, Decimal::new(7, 2));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        for (key, value) in [
            ("MMS_LOGIN_DELAY_MS", "soon"),
            ("MMS_TAX_RATE", "-0.1"),
            ("MMS_PRICE_CEILING", "lots"),
            ("MMS_QUOTE_INBOX", "not-an-email"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == key), "{key}");
        }
    }

    #[test]
    fn test_without_latency() {
        let config = load(&[]).unwrap().without_latency();
        assert_eq!(config.latency, SimulatedLatency::none());
    }
}
