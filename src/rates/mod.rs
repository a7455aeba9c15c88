//! Exchange-rate service client
//!
//! The orchestrator talks to a [`RateProvider`]; the HTTP implementation
//! calls `GET <base>/convert?from=&to=&amount=` and validates the response
//! shape at the boundary.

use crate::config::RatesApiConfig;
use crate::error::ConversionFailure;
use crate::models::CurrencyCode;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Source of converted amounts (one lookup per conversion)
#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Convert `amount` and return the unrounded result.
    async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<f64, ConversionFailure>;
}

/// Minimal contract of the service response; extra fields are ignored.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Long-lived, connection-pooled client for the rate service
pub struct HttpRateProvider {
    client: Client,
    config: RatesApiConfig,
}

impl HttpRateProvider {
    pub fn new(config: RatesApiConfig) -> crate::Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/convert", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &'static str {
        "exchangerate_host"
    }

    async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> Result<f64, ConversionFailure> {
        let amount = amount.normalize().to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("amount", amount.as_str()),
        ];
        if let Some(access_key) = self.config.access_key.as_deref() {
            query.push(("access_key", access_key));
        }

        debug!(%from, %to, %amount, "Requesting conversion");

        let response = self
            .client
            .get(self.endpoint())
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                error!("Rate service request failed: {}", e);
                ConversionFailure::network(format!("rate service request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Rate service error response: {}", body);
            return Err(ConversionFailure::network(format!(
                "rate service returned {}",
                status
            )));
        }

        let body: ConvertResponse = response.json().await.map_err(|e| {
            error!("Failed to parse rate service response: {}", e);
            ConversionFailure::network(format!("malformed rate service response: {}", e))
        })?;

        interpret(body, from, to)
    }
}

fn interpret(
    body: ConvertResponse,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<f64, ConversionFailure> {
    if body.success != Some(true) {
        warn!(%from, %to, error = ?body.error, "Rate service declined conversion");
        return Err(ConversionFailure::invalid(format!(
            "rate service declined {} -> {}",
            from, to
        )));
    }

    body.result
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            error!(result = ?body.result, "Rate service returned no numeric result");
            ConversionFailure::network("rate service response has no numeric result")
        })
}
