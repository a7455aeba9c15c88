//! Conversion Orchestrator
//!
//! TEXT → PARSE → NORMALIZE → RATE LOOKUP → ROUND → SYMBOLS → RESULT
//!
//! Stateless and re-entrant: concurrent calls share nothing but the
//! read-only currency tables and the pooled HTTP client.

use crate::currency::symbol_for;
use crate::error::ConversionFailure;
use crate::models::{ConversionRequest, ConversionResult, CurrencyCode};
use crate::parser::PhraseParser;
use crate::rates::RateProvider;
use crate::Result;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Decimal places kept in converted amounts
const RESULT_DECIMAL_PLACES: u32 = 2;

pub struct ConversionOrchestrator {
    provider: Arc<dyn RateProvider>,
}

impl ConversionOrchestrator {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Single attempt; any failure is returned to the caller as-is.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> std::result::Result<ConversionResult, ConversionFailure> {
        let start = Instant::now();

        let raw = match self.provider.convert(from, to, amount).await {
            Ok(raw) => raw,
            Err(failure) => {
                warn!(
                    provider = self.provider.name(),
                    %from,
                    %to,
                    kind = ?failure.kind,
                    "Conversion failed"
                );
                return Err(failure);
            }
        };

        let converted_amount = round_half_up(raw).ok_or_else(|| {
            ConversionFailure::network(format!("rate service result {} out of range", raw))
        })?;

        info!(
            provider = self.provider.name(),
            %amount,
            %from,
            %to,
            %converted_amount,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Conversion complete"
        );

        Ok(ConversionResult {
            amount,
            from_currency: from.clone(),
            to_currency: to.clone(),
            converted_amount,
            from_symbol: symbol_for(from),
            to_symbol: symbol_for(to),
        })
    }

    pub async fn convert_request(
        &self,
        request: &ConversionRequest,
    ) -> std::result::Result<ConversionResult, ConversionFailure> {
        self.convert(request.amount(), request.from_currency(), request.to_currency())
            .await
    }

    /// Parse a phrase and convert it
    pub async fn parse_and_convert(&self, text: &str) -> Result<ConversionResult> {
        let request = PhraseParser::parse(text)?;
        Ok(self.convert_request(&request).await?)
    }
}

/// Round to two places, halves away from zero
fn round_half_up(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| {
        d.round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConversionFailureKind, ParseFailure, VoiceCurrencyError};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Returns a canned outcome and remembers what it was asked
    struct StubProvider {
        outcome: std::result::Result<f64, ConversionFailure>,
        calls: Mutex<Vec<(String, String, Decimal)>>,
    }

    impl StubProvider {
        fn new(outcome: std::result::Result<f64, ConversionFailure>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RateProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn convert(
            &self,
            from: &CurrencyCode,
            to: &CurrencyCode,
            amount: Decimal,
        ) -> std::result::Result<f64, ConversionFailure> {
            self.calls
                .lock()
                .unwrap()
                .push((from.to_string(), to.to_string(), amount));
            self.outcome.clone()
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(92.34567), Some(dec!(92.35)));
        assert_eq!(round_half_up(0.125), Some(dec!(0.13)));
        assert_eq!(round_half_up(10.0), Some(dec!(10)));
        assert_eq!(round_half_up(f64::NAN), None);
    }

    #[tokio::test]
    async fn test_convert_builds_result() {
        let provider = StubProvider::new(Ok(92.34567));
        let orchestrator = ConversionOrchestrator::new(provider.clone());

        let result = orchestrator
            .convert(dec!(100), &CurrencyCode::new("USD"), &CurrencyCode::new("EUR"))
            .await
            .unwrap();

        assert_eq!(result.converted_amount, dec!(92.35));
        assert_eq!(result.amount, dec!(100));
        assert_eq!(result.from_symbol, "💵");
        assert_eq!(result.to_symbol, "💶");

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("USD".to_string(), "EUR".to_string(), dec!(100)));
    }

    #[tokio::test]
    async fn test_unmapped_codes_get_fallback_symbol() {
        let orchestrator = ConversionOrchestrator::new(StubProvider::new(Ok(5.0)));

        let result = orchestrator
            .convert(dec!(1), &CurrencyCode::new("HKD"), &CurrencyCode::new("BRL"))
            .await
            .unwrap();

        assert_eq!(result.from_symbol, crate::currency::FALLBACK_SYMBOL);
        assert_eq!(result.to_symbol, "🇧🇷");
    }

    #[tokio::test]
    async fn test_failures_are_passed_through_without_retry() {
        let provider = StubProvider::new(Err(ConversionFailure::invalid("bad pair")));
        let orchestrator = ConversionOrchestrator::new(provider.clone());

        let failure = orchestrator
            .convert(dec!(1), &CurrencyCode::new("USD"), &CurrencyCode::new("XYZ"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, ConversionFailureKind::InvalidConversion);
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parse_and_convert() {
        let orchestrator = ConversionOrchestrator::new(StubProvider::new(Ok(7890.123)));

        let result = orchestrator.parse_and_convert("50 pounds to yen").await.unwrap();
        assert_eq!(result.from_currency, "GBP");
        assert_eq!(result.to_currency, "JPY");
        assert_eq!(result.converted_amount, dec!(7890.12));
    }

    #[tokio::test]
    async fn test_parse_failure_skips_rate_lookup() {
        let provider = StubProvider::new(Ok(1.0));
        let orchestrator = ConversionOrchestrator::new(provider.clone());

        let err = orchestrator.parse_and_convert("hello world").await.unwrap_err();
        assert!(matches!(
            err,
            VoiceCurrencyError::Parse(ParseFailure::NoRecognizablePhrase)
        ));
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
