//! REST API Server for the voice currency converter
//!
//! Exposes manual entry, transcript conversion and per-session UI state
//! over HTTP for a browser front-end.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::currency::supported_currencies;
use crate::error::{ConversionFailureKind, VoiceCurrencyError};
use crate::models::{ConversionRequest, ConversionResult};
use crate::narration::{display_line, utterance_for};
use crate::orchestrator::ConversionOrchestrator;
use crate::state::{NotificationLevel, SessionStore};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ManualConversionRequest {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Failure that still carries state the client should render
    pub fn error_with_data<T: Serialize>(message: String, data: T) -> Self {
        Self {
            success: false,
            data: serde_json::to_value(data).ok(),
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn status_for(err: &VoiceCurrencyError) -> StatusCode {
    match err {
        VoiceCurrencyError::Parse(_) | VoiceCurrencyError::UnsupportedCurrency(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        VoiceCurrencyError::Conversion(failure) => match failure.kind {
            ConversionFailureKind::InvalidConversion => StatusCode::UNPROCESSABLE_ENTITY,
            ConversionFailureKind::NetworkError => StatusCode::BAD_GATEWAY,
        },
        VoiceCurrencyError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        VoiceCurrencyError::SessionBusy(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: VoiceCurrencyError) -> ApiResult {
    info!(error = %err, "Request failed");
    (status_for(&err), Json(ApiResponse::error(err.to_string())))
}

fn conversion_payload(result: &ConversionResult) -> serde_json::Value {
    serde_json::json!({
        "result": result,
        "display": display_line(result),
        "utterance": utterance_for(result),
    })
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<ConversionOrchestrator>,
    pub sessions: Arc<SessionStore>,
}

/// =============================
/// Health & Catalogue
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_currencies() -> Json<ApiResponse> {
    Json(ApiResponse::success(supported_currencies()))
}

/// =============================
/// Conversion Endpoints
/// =============================

async fn manual_convert(
    State(state): State<ApiState>,
    Json(req): Json<ManualConversionRequest>,
) -> ApiResult {
    info!(amount = %req.amount, from = %req.from, to = %req.to, "Manual conversion request");

    let request = match ConversionRequest::manual(req.amount, &req.from, &req.to) {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };

    match state.orchestrator.convert_request(&request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(conversion_payload(&result))),
        ),
        Err(failure) => error_response(failure.into()),
    }
}

async fn voice_convert(
    State(state): State<ApiState>,
    Json(req): Json<TranscriptRequest>,
) -> ApiResult {
    info!("Received transcript: {}", req.transcript);

    match state.orchestrator.parse_and_convert(&req.transcript).await {
        Ok(result) => {
            let mut payload = conversion_payload(&result);
            payload["transcript"] = serde_json::json!(req.transcript);
            (StatusCode::OK, Json(ApiResponse::success(payload)))
        }
        Err(e) => error_response(e),
    }
}

/// =============================
/// Session Endpoints
/// =============================

async fn create_session(State(state): State<ApiState>) -> ApiResult {
    let session_id = state.sessions.create().await;
    info!(%session_id, "Session created");

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(serde_json::json!({ "session_id": session_id }))),
    )
}

async fn get_session(State(state): State<ApiState>, Path(session_id): Path<Uuid>) -> ApiResult {
    match state.sessions.snapshot(session_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(ApiResponse::success(snapshot))),
        Err(e) => error_response(e),
    }
}

async fn session_transcript(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<TranscriptRequest>,
) -> ApiResult {
    let session = match state.sessions.get(session_id).await {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    // the lock covers state transitions only, never the rate service call
    {
        let mut session_state = session.lock().await;
        if let Err(e) = session_state.start_listening() {
            return error_response(e);
        }
        session_state.finish_listening();
        session_state.record_transcript(req.transcript.clone());
        if let Err(e) = session_state.begin_conversion() {
            return error_response(e);
        }
    }

    let outcome = state.orchestrator.parse_and_convert(&req.transcript).await;

    let mut session_state = session.lock().await;
    let notification = session_state.settle_conversion(outcome);
    let utterance = session_state.conversion_result.as_ref().map(utterance_for);
    let data = serde_json::json!({
        "notification": &notification,
        "utterance": utterance,
        "session": &*session_state,
    });

    match notification.level {
        NotificationLevel::Error => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error_with_data(notification.message, data)),
        ),
        _ => (StatusCode::OK, Json(ApiResponse::success(data))),
    }
}

async fn delete_session(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult {
    match state.sessions.remove(session_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "session_id": session_id }))),
        ),
        Err(e) => error_response(e),
    }
}

async fn toggle_dark_mode(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult {
    let session = match state.sessions.get(session_id).await {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    let is_dark_mode = session.lock().await.toggle_dark_mode();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({ "is_dark_mode": is_dark_mode }))),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<ConversionOrchestrator>) -> Router {
    let state = ApiState {
        orchestrator,
        sessions: Arc::new(SessionStore::new()),
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/currencies", get(list_currencies))
        .route("/api/convert", post(manual_convert))
        .route("/api/voice", post(voice_convert))
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:session_id",
            get(get_session).delete(delete_session),
        )
        .route("/api/sessions/:session_id/transcript", post(session_transcript))
        .route("/api/sessions/:session_id/dark-mode", post(toggle_dark_mode))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<ConversionOrchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
