//! HTTP implementation of [`ChatBackend`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::backend::{ChatBackend, ChatError, ChatResult, OutboundMessage};

const ENDPOINT_ENV: &str = "CHAT_WEBHOOK_URL";
const API_KEY_ENV: &str = "CHAT_WEBHOOK_API_KEY";

/// Client for the remote chat webhook. No request timeout is applied: a hung
/// request stays in flight until the caller cancels the exchange.
pub struct WebhookBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl WebhookBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Configure from `CHAT_WEBHOOK_URL` and optional `CHAT_WEBHOOK_API_KEY`.
    /// Returns `None` when no endpoint is set.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).ok()?;
        let backend = Self::new(endpoint);
        match std::env::var(API_KEY_ENV) {
            Ok(key) => Some(backend.with_api_key(key)),
            Err(_) => Some(backend),
        }
    }
}

#[async_trait]
impl ChatBackend for WebhookBackend {
    async fn send(&self, outbound: &OutboundMessage) -> ChatResult<Value> {
        debug!(endpoint = %self.endpoint, "posting chat message");

        let mut request = self.client.post(&self.endpoint).json(outbound);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = body.chars().take(200).collect::<String>();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Some webhooks answer with plain text rather than JSON.
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(body)),
        }
    }
}
