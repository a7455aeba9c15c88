//! Speech collaborators
//!
//! Recognition is modelled as one awaited call with three outcomes instead
//! of result/error/end callbacks. Synthesis is fire-and-forget.

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Locale used for every listening session
pub const RECOGNITION_LOCALE: &str = "en-US";

/// One-shot recognition settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub continuous: bool,
    pub interim_results: bool,
    pub lang: &'static str,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            interim_results: false,
            lang: RECOGNITION_LOCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Best-guess transcript for the session
    Transcript(String),
    Error(String),
    EndedWithoutResult,
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self, config: &RecognitionConfig) -> RecognitionOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 1.1,
            volume: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceSettings,
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Queue the utterance; no completion is reported back.
    fn speak(&self, utterance: &Utterance);
}

/// Treats one line of text from a reader as the transcript.
///
/// Stands in for a microphone when running from a terminal.
pub struct LineRecognizer<R> {
    reader: Mutex<R>,
}

impl<R> LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

impl LineRecognizer<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> SpeechRecognizer for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&self, config: &RecognitionConfig) -> RecognitionOutcome {
        debug!(lang = config.lang, "Listening for one line");

        let mut line = String::new();
        let mut reader = self.reader.lock().await;

        match reader.read_line(&mut line).await {
            Ok(_) if line.trim().is_empty() => RecognitionOutcome::EndedWithoutResult,
            Ok(_) => RecognitionOutcome::Transcript(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read transcript: {}", e);
                RecognitionOutcome::Error(e.to_string())
            }
        }
    }
}

/// Prints utterances to stdout
pub struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&self, utterance: &Utterance) {
        info!(
            rate = utterance.voice.rate,
            pitch = utterance.voice.pitch,
            volume = utterance.voice.volume,
            "Speaking result"
        );
        println!("🔊 {}", utterance.text);
    }
}

/// Drops every utterance
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&self, _utterance: &Utterance) {}
}
