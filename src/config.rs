//! Environment configuration
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file by the binaries.

use crate::error::VoiceCurrencyError;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_RATES_API_BASE_URL: &str = "https://api.exchangerate.host";
pub const DEFAULT_API_PORT: u16 = 8080;

/// Settings for the exchange-rate service client
#[derive(Debug, Clone)]
pub struct RatesApiConfig {
    pub base_url: String,
    pub access_key: Option<String>,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for RatesApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RATES_API_BASE_URL.to_string(),
            access_key: None,
            timeout: None,
        }
    }
}

impl RatesApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub rates_api: RatesApiConfig,
    pub api_port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in practice)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut rates_api = RatesApiConfig::default();

        if let Some(base_url) = non_empty("RATES_API_BASE_URL") {
            rates_api = rates_api.with_base_url(base_url);
        }

        if let Some(access_key) = non_empty("RATES_API_ACCESS_KEY") {
            rates_api = rates_api.with_access_key(access_key);
        }

        if let Some(raw) = non_empty("RATES_API_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                VoiceCurrencyError::Config(format!(
                    "RATES_API_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?;
            rates_api = rates_api.with_timeout(Duration::from_secs(secs));
        }

        let api_port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                VoiceCurrencyError::Config(format!("invalid port {:?}", raw))
            })?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            rates_api,
            api_port,
        })
    }
}
