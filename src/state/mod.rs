//! Session state
//!
//! UI flags, transcript and last result live in an explicit struct owned by
//! the caller. [`VoiceSession`] drives one listen → convert → speak cycle
//! against it as straight-line code.

use crate::error::{VoiceCurrencyError, COULDNT_CONVERT, DIDNT_CATCH_THAT};
use crate::models::ConversionResult;
use crate::narration::utterance_for;
use crate::orchestrator::ConversionOrchestrator;
use crate::speech::{RecognitionConfig, RecognitionOutcome, SpeechRecognizer, SpeechSynthesizer};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const LISTENING_HINT: &str =
    "🎤 Listening... Say something like 'Convert 100 dollars to euros'";
pub const CONVERSION_COMPLETE: &str = "✅ Conversion complete!";

/// Sessions untouched for this long are dropped from the store
pub const SESSION_IDLE_TTL_SECS: i64 = 30 * 60;
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Toast-style message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&VoiceCurrencyError> for Notification {
    fn from(err: &VoiceCurrencyError) -> Self {
        Notification::error(err.user_message())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub is_listening: bool,
    pub is_converting: bool,
    pub is_dark_mode: bool,
    pub transcript: String,
    pub conversion_result: Option<ConversionResult>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.is_listening || self.is_converting
    }

    /// Begin a listening session, clearing the previous transcript and result.
    pub fn start_listening(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(VoiceCurrencyError::SessionBusy(
                "a listening or conversion cycle is already running".to_string(),
            ));
        }

        self.is_listening = true;
        self.transcript.clear();
        self.conversion_result = None;
        Ok(())
    }

    pub fn finish_listening(&mut self) {
        self.is_listening = false;
    }

    pub fn record_transcript(&mut self, transcript: impl Into<String>) {
        self.transcript = transcript.into();
    }

    pub fn begin_conversion(&mut self) -> Result<()> {
        if self.is_converting {
            return Err(VoiceCurrencyError::SessionBusy(
                "a conversion is already running".to_string(),
            ));
        }

        self.is_converting = true;
        Ok(())
    }

    pub fn complete_conversion(&mut self, result: ConversionResult) {
        self.conversion_result = Some(result);
        self.is_converting = false;
    }

    pub fn fail_conversion(&mut self) {
        self.is_converting = false;
    }

    /// Record the outcome of a conversion started with [`Self::begin_conversion`].
    pub fn settle_conversion(&mut self, outcome: Result<ConversionResult>) -> Notification {
        match outcome {
            Ok(result) => {
                self.complete_conversion(result);
                Notification::success(CONVERSION_COMPLETE)
            }
            Err(e) => {
                warn!(error = %e, "Conversion error");
                self.fail_conversion();
                Notification::error(COULDNT_CONVERT)
            }
        }
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.is_dark_mode = !self.is_dark_mode;
        self.is_dark_mode
    }
}

/// Listen → parse → convert → speak, against caller-owned state
pub struct VoiceSession {
    recognizer: Arc<dyn SpeechRecognizer>,
    orchestrator: Arc<ConversionOrchestrator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: RecognitionConfig,
}

impl VoiceSession {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        orchestrator: Arc<ConversionOrchestrator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            recognizer,
            orchestrator,
            synthesizer,
            config: RecognitionConfig::default(),
        }
    }

    /// Run one cycle. Busy sessions are rejected; every other failure becomes
    /// an error notification and leaves the state interactive.
    pub async fn run(&self, state: &mut SessionState) -> Result<Notification> {
        state.start_listening()?;
        info!("{}", LISTENING_HINT);

        let outcome = self.recognizer.listen(&self.config).await;
        state.finish_listening();

        match outcome {
            RecognitionOutcome::Transcript(text) => {
                info!(transcript = %text, "Speech recognized");
                state.record_transcript(text.clone());
                let notification = convert_transcript(
                    &self.orchestrator,
                    Some(self.synthesizer.as_ref()),
                    state,
                    &text,
                )
                .await;
                Ok(notification)
            }
            RecognitionOutcome::Error(reason) => {
                warn!(%reason, "Speech recognition error");
                Ok(Notification::error(DIDNT_CATCH_THAT))
            }
            RecognitionOutcome::EndedWithoutResult => {
                info!("Listening ended without a transcript");
                Ok(Notification::info("Listening ended"))
            }
        }
    }
}

/// Convert an already-recognized transcript and record the outcome in `state`.
pub async fn convert_transcript(
    orchestrator: &ConversionOrchestrator,
    synthesizer: Option<&dyn SpeechSynthesizer>,
    state: &mut SessionState,
    text: &str,
) -> Notification {
    if let Err(e) = state.begin_conversion() {
        return Notification::from(&e);
    }

    let outcome = orchestrator.parse_and_convert(text).await;
    if let (Ok(result), Some(synthesizer)) = (&outcome, synthesizer) {
        synthesizer.speak(&utterance_for(result));
    }
    state.settle_conversion(outcome)
}

struct SessionEntry {
    state: Arc<tokio::sync::Mutex<SessionState>>,
    last_touched: DateTime<Utc>,
    // breaks ties between touches within one clock tick
    touch_seq: u64,
}

#[derive(Default)]
struct SessionTable {
    entries: HashMap<Uuid, SessionEntry>,
    next_seq: u64,
}

impl SessionTable {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// In-memory session registry for the HTTP surface.
///
/// Idle sessions are pruned whenever a new one is created. Once the cap is
/// reached the least recently touched session is evicted.
pub struct SessionStore {
    sessions: RwLock<SessionTable>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(Duration::seconds(SESSION_IDLE_TTL_SECS), MAX_SESSIONS)
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(SessionTable::default()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self) -> Uuid {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now);

        let session_id = Uuid::new_v4();
        let touch_seq = sessions.next_seq();
        sessions.entries.insert(
            session_id,
            SessionEntry {
                state: Arc::new(tokio::sync::Mutex::new(SessionState::new())),
                last_touched: now,
                touch_seq,
            },
        );
        session_id
    }

    /// Look up a session and mark it as recently used
    pub async fn get(&self, session_id: Uuid) -> Result<Arc<tokio::sync::Mutex<SessionState>>> {
        let mut sessions = self.sessions.write().await;
        let touch_seq = sessions.next_seq();
        let entry = sessions
            .entries
            .get_mut(&session_id)
            .ok_or_else(|| VoiceCurrencyError::SessionNotFound(session_id.to_string()))?;

        entry.last_touched = Utc::now();
        entry.touch_seq = touch_seq;
        Ok(entry.state.clone())
    }

    pub async fn snapshot(&self, session_id: Uuid) -> Result<SessionState> {
        let session = self.get(session_id).await?;
        let state = session.lock().await;
        Ok(state.clone())
    }

    pub async fn remove(&self, session_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entries
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| VoiceCurrencyError::SessionNotFound(session_id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn prune(&self, table: &mut SessionTable, now: DateTime<Utc>) {
        let before = table.entries.len();
        let idle_ttl = self.idle_ttl;
        table
            .entries
            .retain(|_, entry| now - entry.last_touched < idle_ttl);

        while table.entries.len() >= self.max_sessions {
            let oldest = table
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.last_touched, entry.touch_seq))
                .map(|(id, _)| *id);
            let Some(id) = oldest else { break };
            table.entries.remove(&id);
        }

        let evicted = before - table.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = table.entries.len(), "Evicted sessions");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
