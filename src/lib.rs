//! Starling is a chat session engine for webhook-backed conversational backends.
//!
//! The engine turns user input into an ordered, cancellable sequence of
//! request/response exchanges against a remote webhook, keeping a stable
//! session identity across messages.
//!
//! # Architecture
//!
//! - `types` - conversation log entries
//! - `session` - persistent session token
//! - `lifecycle` - single-in-flight request serialization and cancellation
//! - `backend` - backend trait and reply-shape extraction
//! - `webhook` - HTTP backend implementation
//! - `engine` - the exchange engine tying it all together
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use starling::{ChatEngine, SessionStore, WebhookBackend};
//!
//! # async fn example() {
//! let backend = WebhookBackend::new("https://example.com/webhook/chat");
//! let engine = ChatEngine::new(Arc::new(backend), SessionStore::new());
//! engine.send_message("Hello!").await;
//! for entry in engine.messages() {
//!     println!("{:?}: {}", entry.role, entry.content);
//! }
//! # }
//! ```

pub mod backend;
pub mod engine;
pub mod lifecycle;
pub mod session;
pub mod types;
pub mod webhook;

pub use backend::{ChatBackend, ChatError, ChatResult, OutboundMessage, extract_reply_text};
pub use engine::{ChatEngine, FALLBACK_REPLY};
pub use lifecycle::{RequestLifecycle, RequestTicket};
pub use session::SessionStore;
pub use types::{ChatMessage, Role};
pub use webhook::WebhookBackend;
