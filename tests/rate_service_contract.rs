//! Rate service contract tests
//!
//! Drive the HTTP rate provider through the orchestrator against a mock
//! exchange-rate service and check request shape and failure mapping.

use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use voice_currency_converter::config::RatesApiConfig;
use voice_currency_converter::error::{ConversionFailureKind, VoiceCurrencyError};
use voice_currency_converter::models::CurrencyCode;
use voice_currency_converter::orchestrator::ConversionOrchestrator;
use voice_currency_converter::rates::HttpRateProvider;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator_for(config: RatesApiConfig) -> ConversionOrchestrator {
    let provider = HttpRateProvider::new(config).expect("client builds");
    ConversionOrchestrator::new(Arc::new(provider))
}

fn orchestrator(server: &MockServer) -> ConversionOrchestrator {
    orchestrator_for(RatesApiConfig::default().with_base_url(server.uri()))
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn eur() -> CurrencyCode {
    CurrencyCode::new("EUR")
}

#[tokio::test]
async fn test_successful_conversion_is_rounded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "EUR"))
        .and(query_param("amount", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "query": {"from": "USD", "to": "EUR", "amount": 100},
            "date": "2026-10-18",
            "result": 92.34567
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = orchestrator(&server).convert(dec!(100), &usd(), &eur()).await;
    let result = assert_ok!(result);

    assert_eq!(result.converted_amount, dec!(92.35));
    assert_eq!(result.from_symbol, "💵");
    assert_eq!(result.to_symbol, "💶");
}

#[tokio::test]
async fn test_parsed_phrase_reaches_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("from", "EUR"))
        .and(query_param("to", "CAD"))
        .and(query_param("amount", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": 36.4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = orchestrator(&server)
        .parse_and_convert("25 euros in canadian dollars")
        .await;
    let result = assert_ok!(result);

    assert_eq!(result.to_currency, "CAD");
    assert_eq!(result.converted_amount, dec!(36.4));
}

#[tokio::test]
async fn test_amount_is_sent_without_trailing_zeros() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("amount", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": 92.3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("amount", "12.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": 11.54
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&server);
    assert_ok!(orchestrator.parse_and_convert("100.0 dollars to euros").await);
    assert_ok!(orchestrator.convert(dec!(12.50), &usd(), &eur()).await);
}

#[tokio::test]
async fn test_access_key_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("access_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": 1.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = RatesApiConfig::default()
        .with_base_url(server.uri())
        .with_access_key("test-key");

    assert_ok!(orchestrator_for(config).convert(dec!(1), &usd(), &eur()).await);
}

#[tokio::test]
async fn test_declined_conversion_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": {"code": 402, "info": "invalid currency"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let failure = assert_err!(
        orchestrator(&server)
            .convert(dec!(1), &usd(), &CurrencyCode::new("ZORK"))
            .await
    );
    assert_eq!(failure.kind, ConversionFailureKind::InvalidConversion);
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let failure = assert_err!(orchestrator(&server).convert(dec!(1), &usd(), &eur()).await);
    assert_eq!(failure.kind, ConversionFailureKind::NetworkError);
}

#[tokio::test]
async fn test_non_json_body_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let failure = assert_err!(orchestrator(&server).convert(dec!(1), &usd(), &eur()).await);
    assert_eq!(failure.kind, ConversionFailureKind::NetworkError);
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    // nothing listens on the discard port
    let config = RatesApiConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2));

    let failure = assert_err!(orchestrator_for(config).convert(dec!(1), &usd(), &eur()).await);
    assert_eq!(failure.kind, ConversionFailureKind::NetworkError);
}

#[tokio::test]
async fn test_unparseable_phrase_never_calls_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = assert_err!(orchestrator(&server).parse_and_convert("hello world").await);
    assert!(matches!(err, VoiceCurrencyError::Parse(_)));
}
