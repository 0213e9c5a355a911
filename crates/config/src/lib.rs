//! Configuration for the gridmate assistant.
//!
//! Two concerns live here:
//! - [`settings`] — model, endpoint, temperature, timeout.
//! - [`credentials`] — the API key lifecycle (load at startup, set at
//!   runtime, clear on request), behind an injectable store so the
//!   translation pipeline is testable without touching the filesystem.

pub mod credentials;
pub mod settings;

pub use credentials::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use settings::Settings;

use std::path::PathBuf;

/// Environment variable that overrides the config directory (tests, CI).
pub const CONFIG_DIR_ENV: &str = "GRIDMATE_CONFIG_DIR";

/// Resolve the gridmate config directory.
///
/// `GRIDMATE_CONFIG_DIR` wins; otherwise the platform config dir
/// (e.g. `~/.config/gridmate`).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gridmate")
}
