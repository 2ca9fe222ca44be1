//! Message exchange engine.
//!
//! Owns the conversation log and coordinates it with the request lifecycle:
//! send a message, get exactly one assistant reply, end in a terminal state.
//! The log is append-only except for in-place resolution of the single
//! pending placeholder; at most one exchange is ever outstanding.

use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::backend::{ChatBackend, OutboundMessage, extract_reply_text};
use crate::lifecycle::RequestLifecycle;
use crate::session::SessionStore;
use crate::types::ChatMessage;

/// Shown in place of an assistant reply when the exchange fails. The error
/// detail is kept out of the conversation and surfaced via `last_error`.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

struct EngineState {
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
}

pub struct ChatEngine {
    backend: Arc<dyn ChatBackend>,
    sessions: SessionStore,
    lifecycle: RequestLifecycle,
    state: Mutex<EngineState>,
}

impl ChatEngine {
    pub fn new(backend: Arc<dyn ChatBackend>, sessions: SessionStore) -> Self {
        Self {
            backend,
            sessions,
            lifecycle: RequestLifecycle::new(),
            state: Mutex::new(EngineState {
                messages: Vec::new(),
                last_error: None,
            }),
        }
    }

    /// Deliver one user message and resolve the paired assistant reply.
    ///
    /// Whitespace-only input is ignored, and so is a send while another
    /// exchange is outstanding: sends are serialized, not queued. Failures
    /// never propagate; they resolve the placeholder with [`FALLBACK_REPLY`]
    /// and record the detail in `last_error`.
    pub async fn send_message(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let (ticket, placeholder_id) = {
            let mut state = self.state.lock().expect("engine state poisoned");
            if self.lifecycle.busy() {
                debug!("send ignored, another request is in flight");
                return;
            }
            let ticket = self.lifecycle.begin();
            state.last_error = None;
            state.messages.push(ChatMessage::user(trimmed));
            let placeholder = ChatMessage::pending_assistant();
            let placeholder_id = placeholder.id.clone();
            state.messages.push(placeholder);
            (ticket, placeholder_id)
        };

        let outbound = OutboundMessage {
            message: trimmed.to_string(),
            session_id: self.sessions.current(),
            timestamp: OffsetDateTime::now_utc(),
        };
        debug!(session = %outbound.session_id, "sending chat message");

        let result = self.backend.send(&outbound).await;

        let mut state = self.state.lock().expect("engine state poisoned");
        if !self.lifecycle.end(&ticket) {
            // Superseded or cancelled while in flight; the placeholder is
            // already gone and this response must not touch newer state.
            debug!("discarding stale webhook response");
            return;
        }
        match result {
            Ok(body) => {
                let reply = extract_reply_text(&body);
                debug!(chars = reply.len(), "chat reply resolved");
                if let Some(entry) = state.messages.iter_mut().find(|m| m.id == placeholder_id) {
                    entry.content = reply;
                    entry.pending = false;
                }
            }
            Err(err) => {
                warn!(error = %err, "chat exchange failed");
                if let Some(entry) = state.messages.iter_mut().find(|m| m.id == placeholder_id) {
                    entry.content = FALLBACK_REPLY.to_string();
                    entry.pending = false;
                }
                state.last_error = Some(err.to_string());
            }
        }
    }

    /// Empty the log and rotate the session token. The next send starts a
    /// fresh conversation on the backend.
    pub fn clear_messages(&self) {
        let mut state = self.state.lock().expect("engine state poisoned");
        state.messages.clear();
        state.last_error = None;
        self.sessions.reset();
    }

    /// Abandon the outstanding exchange, if any. The pending placeholder is
    /// removed immediately; the user message stays. The in-flight response,
    /// whenever it arrives, is discarded.
    pub fn cancel_request(&self) {
        let mut state = self.state.lock().expect("engine state poisoned");
        if !self.lifecycle.busy() {
            return;
        }
        self.lifecycle.cancel();
        state.messages.retain(|m| !m.pending);
        debug!("chat exchange cancelled");
    }

    /// Snapshot of the conversation log.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state
            .lock()
            .expect("engine state poisoned")
            .messages
            .clone()
    }

    pub fn busy(&self) -> bool {
        self.lifecycle.busy()
    }

    /// Detail of the most recent failed exchange, cleared on the next send.
    pub fn last_error(&self) -> Option<String> {
        self.state
            .lock()
            .expect("engine state poisoned")
            .last_error
            .clone()
    }
}
