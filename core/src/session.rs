//! The chat session state machine.
//!
//! A session owns the transcript and two small sub-machines that share it:
//!
//! - request: `Idle -> AwaitingResponse -> Idle`, at most one assistant call
//!   in flight, so replies land in the order their prompts were sent;
//! - save: one in-flight save per property id, independent of the request
//!   sub-machine and of saves for other properties.
//!
//! Gateway failures never escape. They become fixed assistant entries and the
//! sub-machine always returns to idle, including when the caller drops an
//! operation's future half way through.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::SessionContext;
use crate::gateway::{AssistantGateway, SaveGateway};
use crate::listings::{PropertyListing, QuickFilters};
use crate::transcript::TranscriptEntry;

pub const GREETING: &str = "👋 Hi! I'm Mira. Let's find your dream home.";
pub const FALLBACK_REPLY: &str = "I'm processing your request...";
pub const REQUEST_FAILED: &str = "Sorry, I encountered an error. Please try again.";
pub const SAVE_SUCCEEDED: &str = "✅ Saved successfully!";
pub const SAVE_FAILED: &str = "❌ Failed to save property. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    AwaitingResponse,
}

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank text, all-empty filters or a blank property id
    EmptyInput,
    /// Another assistant request is still in flight
    AwaitingResponse,
    /// This property is already being saved
    AlreadySaving,
}

/// Result of one session operation, carrying the assistant entry it appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Answered(TranscriptEntry),
    Failed(TranscriptEntry),
    Saved(TranscriptEntry),
    SaveFailed(TranscriptEntry),
}

impl Outcome {
    pub fn entry(&self) -> Option<&TranscriptEntry> {
        match self {
            Outcome::Skipped(_) => None,
            Outcome::Answered(e) | Outcome::Failed(e) | Outcome::Saved(e) | Outcome::SaveFailed(e) => {
                Some(e)
            }
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_) | Outcome::SaveFailed(_))
    }
}

#[derive(Debug)]
struct SessionState {
    transcript: Vec<TranscriptEntry>,
    request: RequestState,
    saving: BTreeSet<String>,
}

enum Slot {
    Request,
    Save(String),
}

impl SessionState {
    fn release(&mut self, slot: &Slot) {
        match slot {
            Slot::Request => self.request = RequestState::Idle,
            Slot::Save(id) => {
                self.saving.remove(id);
            }
        }
    }
}

/// Holds a request or save slot for the duration of a gateway call and frees
/// it on every exit path.
struct InFlight<'a> {
    session: &'a ChatSession,
    slot: Slot,
    released: bool,
}

impl InFlight<'_> {
    fn finish(mut self, entry: TranscriptEntry) {
        let mut state = self.session.lock();
        state.transcript.push(entry);
        state.release(&self.slot);
        self.released = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.released {
            debug!("in-flight operation dropped before completion");
            self.session.lock().release(&self.slot);
        }
    }
}

pub struct ChatSession {
    context: SessionContext,
    assistant: Arc<dyn AssistantGateway>,
    saver: Arc<dyn SaveGateway>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("context", &self.context)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Start a session seeded with the assistant greeting.
    pub fn new(
        context: SessionContext,
        assistant: Arc<dyn AssistantGateway>,
        saver: Arc<dyn SaveGateway>,
    ) -> Self {
        Self {
            context,
            assistant,
            saver,
            state: Mutex::new(SessionState {
                transcript: vec![TranscriptEntry::assistant(GREETING)],
                request: RequestState::Idle,
                saving: BTreeSet::new(),
            }),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Send free text to the assistant. Blank input and input arriving while
    /// a request is in flight are ignored.
    pub async fn submit_text(&self, raw: &str) -> Outcome {
        let text = raw.trim();
        if text.is_empty() {
            return Outcome::Skipped(SkipReason::EmptyInput);
        }
        self.dispatch(TranscriptEntry::user(text), None).await
    }

    /// Send a structured search. The user entry carries a readable summary
    /// plus the filters exactly as given; the gateway gets them normalized.
    pub async fn apply_quick_filter(&self, filters: &QuickFilters) -> Outcome {
        if filters.is_empty() {
            return Outcome::Skipped(SkipReason::EmptyInput);
        }
        let entry = TranscriptEntry::user(filters.summary()).with_filters(Some(filters.clone()));
        self.dispatch(entry, Some(filters.normalized())).await
    }

    async fn dispatch(&self, entry: TranscriptEntry, filters: Option<QuickFilters>) -> Outcome {
        let text = entry.text.clone();
        let guard = {
            let mut state = self.lock();
            if state.request == RequestState::AwaitingResponse {
                debug!("request already in flight, ignoring input");
                return Outcome::Skipped(SkipReason::AwaitingResponse);
            }
            state.transcript.push(entry);
            state.request = RequestState::AwaitingResponse;
            InFlight {
                session: self,
                slot: Slot::Request,
                released: false,
            }
        };

        debug!(structured = filters.is_some(), "sending message to assistant");
        let result = self.assistant.send_message(&text, filters.as_ref()).await;

        let outcome = match result {
            Ok(reply) => {
                let reply_text = reply
                    .response
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_REPLY.to_string());
                debug!(properties = reply.properties.len(), "assistant replied");
                Outcome::Answered(
                    TranscriptEntry::assistant(reply_text)
                        .with_filters(reply.filters)
                        .with_properties(reply.properties),
                )
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "assistant request failed");
                Outcome::Failed(TranscriptEntry::assistant(REQUEST_FAILED))
            }
        };

        if let Some(entry) = outcome.entry() {
            guard.finish(entry.clone());
        }
        outcome
    }

    /// Save a property for the session's user. A second save for the same
    /// property while the first is in flight is ignored; other properties
    /// are not blocked.
    pub async fn save(&self, property_id: &str) -> Outcome {
        let property_id = property_id.trim();
        if property_id.is_empty() {
            return Outcome::Skipped(SkipReason::EmptyInput);
        }

        let guard = {
            let mut state = self.lock();
            if !state.saving.insert(property_id.to_string()) {
                debug!(property_id, "save already in flight");
                return Outcome::Skipped(SkipReason::AlreadySaving);
            }
            InFlight {
                session: self,
                slot: Slot::Save(property_id.to_string()),
                released: false,
            }
        };

        let outcome = match self
            .saver
            .save_property(self.context.user_id(), property_id)
            .await
        {
            Ok(()) => Outcome::Saved(TranscriptEntry::assistant(SAVE_SUCCEEDED)),
            Err(err) => {
                warn!(property_id, error = %err, code = err.code(), "save failed");
                Outcome::SaveFailed(TranscriptEntry::assistant(SAVE_FAILED))
            }
        };

        if let Some(entry) = outcome.entry() {
            guard.finish(entry.clone());
        }
        outcome
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.lock().transcript.clone()
    }

    /// Number of transcript entries. Never zero: the greeting is always there.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    /// Entries appended at or after position `start`.
    pub fn entries_since(&self, start: usize) -> Vec<TranscriptEntry> {
        self.lock()
            .transcript
            .get(start..)
            .map(<[TranscriptEntry]>::to_vec)
            .unwrap_or_default()
    }

    pub fn request_state(&self) -> RequestState {
        self.lock().request
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.request_state() == RequestState::AwaitingResponse
    }

    pub fn saving_property_ids(&self) -> Vec<String> {
        self.lock().saving.iter().cloned().collect()
    }

    pub fn is_saving(&self, property_id: &str) -> bool {
        self.lock().saving.contains(property_id)
    }

    /// Listings from the most recent assistant entry that carried any.
    pub fn latest_properties(&self) -> Option<Vec<PropertyListing>> {
        self.lock()
            .transcript
            .iter()
            .rev()
            .find_map(|e| e.properties.clone())
    }

    // The lock is never held across an await, so a poisoned guard can only
    // come from a panic inside a plain push/insert; the data is still sound.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
