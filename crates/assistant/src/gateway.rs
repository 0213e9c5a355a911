//! Model gateway.
//!
//! The sole network I/O in the core: one POST to a chat-completion
//! endpoint per turn, bearer-token auth, blocking with a configured
//! timeout. Extracts the first choice's message text and nothing else.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gridmate_config::Settings;

const USER_AGENT: &str = concat!("gridmate/", env!("CARGO_PKG_VERSION"));

/// Error from the model call.
#[derive(Debug, Clone)]
pub enum GatewayError {
    /// Connection/timeout/TLS failure before a status was received
    Network(String),
    /// Non-success HTTP status
    Api { status: u16, message: String },
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Network(msg) => write!(f, "Network error: {}", msg),
            GatewayError::Api { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

// ── Chat-completion wire types ──────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Serialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Gateway ─────────────────────────────────────────────────────────

/// Chat-completion client. One outbound request per [`complete`] call.
///
/// [`complete`]: ModelGateway::complete
#[derive(Debug, Clone)]
pub struct ModelGateway {
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl ModelGateway {
    pub fn new(settings: &Settings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Issue one chat-completion request and return the raw text of the
    /// first choice. An absent content path yields an empty string, not
    /// an error — the parser's fallback handles it downstream.
    pub fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![
                ChatRequestMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatRequestMessage {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
        };

        log::debug!("model call: {} ({})", self.endpoint, self.model);

        let response = client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            log::warn!("model call failed with status {}", status);
            return Err(GatewayError::Api { status: status.as_u16(), message });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
