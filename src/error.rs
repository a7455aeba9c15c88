//! Error types for the voice currency converter

use thiserror::Error;

/// Result type alias for converter operations
pub type Result<T> = std::result::Result<T, VoiceCurrencyError>;

/// The text did not describe a conversion we can act on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no recognizable conversion phrase")]
    NoRecognizablePhrase,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailureKind {
    /// Transport failure, non-2xx status or a malformed response body.
    NetworkError,
    /// The service answered but declined the conversion.
    InvalidConversion,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct ConversionFailure {
    pub kind: ConversionFailureKind,
    pub message: String,
}

impl ConversionFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ConversionFailureKind::NetworkError,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: ConversionFailureKind::InvalidConversion,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum VoiceCurrencyError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Parse failure: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Conversion failure: {0}")]
    Conversion(#[from] ConversionFailure),

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session busy: {0}")]
    SessionBusy(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub const DIDNT_CATCH_THAT: &str = "😅 Oops! Didn't catch that. Please try again!";
pub const COULDNT_CONVERT: &str = "😅 Oops! Couldn't convert that. Please try again!";

impl VoiceCurrencyError {
    /// The single toast message shown for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            VoiceCurrencyError::Recognition(_) => DIDNT_CATCH_THAT,
            _ => COULDNT_CONVERT,
        }
    }
}
