//! Credential storage.
//!
//! Reads/writes <config>/gridmate/credentials.json (0600 on Unix).
//! Resolution order: credentials file, then the GRIDMATE_OPENAI_KEY
//! environment variable (CI/headless), then nothing. The store is a
//! trait so the chat session can be tested against an in-memory
//! implementation.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment fallback for the API key.
pub const API_KEY_ENV: &str = "GRIDMATE_OPENAI_KEY";

/// Credentials persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for the chat-completion endpoint
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

/// Where credentials live. Injectable so tests never touch a real
/// persistence backend.
pub trait CredentialStore {
    /// Load saved credentials. `None` when nothing is stored.
    fn load(&self) -> Option<Credentials>;

    /// Persist credentials.
    fn save(&mut self, creds: &Credentials) -> Result<(), String>;

    /// Erase stored credentials. Erasing an empty store is fine.
    fn clear(&mut self) -> Result<(), String>;
}

// ── File-backed store ───────────────────────────────────────────────

/// Default store: JSON file in the config directory, with an
/// environment-variable fallback for reads.
#[derive(Debug, Default)]
pub struct FileCredentialStore;

impl FileCredentialStore {
    pub fn new() -> Self {
        Self
    }

    /// Returns the path to the credentials file.
    pub fn path() -> PathBuf {
        crate::config_dir().join("credentials.json")
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credentials> {
        let path = Self::path();
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(creds) = serde_json::from_str::<Credentials>(&contents) {
                return Some(creds);
            }
            log::warn!("ignoring unreadable credentials file at {}", path.display());
        }

        // Environment fallback for headless use
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Some(Credentials::new(key)),
            _ => None,
        }
    }

    fn save(&mut self, creds: &Credentials) -> Result<(), String> {
        let path = Self::path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let contents = serde_json::to_string_pretty(creds)
            .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

        fs::write(&path, &contents)
            .map_err(|e| format!("Failed to write credentials file: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, permissions)
                .map_err(|e| format!("Failed to set file permissions: {}", e))?;
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), String> {
        let path = Self::path();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| format!("Failed to delete credentials file: {}", e))?;
        }
        Ok(())
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Test double; also useful for embedding hosts that manage their own
/// secrets.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    creds: Option<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self { creds: None }
    }

    pub fn with_key(key: &str) -> Self {
        Self { creds: Some(Credentials::new(key.to_string())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<Credentials> {
        self.creds.clone()
    }

    fn save(&mut self, creds: &Credentials) -> Result<(), String> {
        self.creds = Some(creds.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), String> {
        self.creds = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ENV_LOCK;

    #[test]
    fn test_memory_store_lifecycle() {
        let mut store = MemoryCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&Credentials::new("sk-test".into())).unwrap();
        assert_eq!(store.load().unwrap().api_key, "sk-test");

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(crate::CONFIG_DIR_ENV, dir.path());
        std::env::remove_var(API_KEY_ENV);

        let mut store = FileCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&Credentials::new("sk-file".into())).unwrap();
        assert_eq!(store.load().unwrap().api_key, "sk-file");
        assert!(FileCredentialStore::path().exists());

        store.clear().unwrap();
        assert!(store.load().is_none());

        std::env::remove_var(crate::CONFIG_DIR_ENV);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(crate::CONFIG_DIR_ENV, dir.path());

        let mut store = FileCredentialStore::new();
        store.save(&Credentials::new("sk-perm".into())).unwrap();

        let mode = std::fs::metadata(FileCredentialStore::path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);

        std::env::remove_var(crate::CONFIG_DIR_ENV);
    }
}
