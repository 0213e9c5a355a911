// Assistant settings
// Loaded from <config>/gridmate/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default chat-completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default request timeout. Outbound calls always carry one; a hung
/// request must not hang the turn.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Low temperature keeps the operation JSON stable across turns.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier sent with every request
    pub model: String,

    /// Chat-completion endpoint. Overridable for tests and self-hosted
    /// gateways.
    pub endpoint: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        crate::config_dir().join("settings.json")
    }

    /// Load settings, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load() -> Self {
        let path = Self::path();
        fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}
