//! Session identity for the chat webhook.
//!
//! A session token correlates every message sent from one engine instance
//! into a single logical conversation on the remote backend. The token is
//! cached in memory and mirrored to a small file under the platform data
//! directory so it survives restarts until explicitly reset.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

const SESSION_FILE: &str = "session";

pub struct SessionStore {
    dir: Option<PathBuf>,
    token: Mutex<Option<String>>,
}

impl SessionStore {
    /// Store backed by `<data_local_dir>/starling/session`.
    pub fn new() -> Self {
        Self {
            dir: dirs::data_local_dir().map(|d| d.join("starling")),
            token: Mutex::new(None),
        }
    }

    /// Store backed by an explicit directory. Independent instances given
    /// different directories do not interfere.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            token: Mutex::new(None),
        }
    }

    /// Store that never touches the filesystem. The token lives for the
    /// lifetime of the store only.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            token: Mutex::new(None),
        }
    }

    /// Current session token, created lazily on first access.
    pub fn current(&self) -> String {
        let mut token = self.token.lock().expect("session store poisoned");
        if let Some(existing) = token.as_ref() {
            return existing.clone();
        }
        let loaded = self.read_persisted().unwrap_or_else(|| {
            let fresh = new_session_token();
            self.persist(&fresh);
            fresh
        });
        *token = Some(loaded.clone());
        loaded
    }

    /// Replace the token with a freshly generated one. Callers that also
    /// want a blank conversation clear the message log separately.
    pub fn reset(&self) -> String {
        let fresh = new_session_token();
        self.persist(&fresh);
        let mut token = self.token.lock().expect("session store poisoned");
        *token = Some(fresh.clone());
        fresh
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(SESSION_FILE))
    }

    fn read_persisted(&self) -> Option<String> {
        let path = self.session_path()?;
        let contents = fs::read_to_string(path).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Best effort: an unwritable directory degrades to an in-memory token.
    fn persist(&self, token: &str) {
        let Some(dir) = self.dir.as_ref() else {
            return;
        };
        if let Err(err) = fs::create_dir_all(dir) {
            warn!(error = %err, "session storage unavailable, keeping token in memory");
            return;
        }
        if let Err(err) = fs::write(dir.join(SESSION_FILE), token) {
            warn!(error = %err, "failed to persist session token");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond timestamp plus a random suffix. Uniqueness is not
/// cryptographic; collisions are negligible for correlating conversations.
fn new_session_token() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session-{millis}-{}", &suffix[..8])
}
