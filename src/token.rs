//! Credential persistence.
//!
//! The renderer access token is process-wide state with a small lifecycle:
//! absent (host prompts the user) → supplied → persisted → reused on later
//! sessions. The store is injected so the engine never reads ambient
//! storage inline.

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    token: String,
}

/// Stores and retrieves the renderer access credential.
///
/// No expiry or validation beyond presence.
pub trait TokenStore {
    /// Returns the previously persisted credential, if any
    fn load(&self) -> crate::Result<Option<String>>;

    /// Persists the credential for future sessions
    fn save(&mut self, token: &str) -> crate::Result<()>;
}

/// File-backed store at a fixed per-user path
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Uses the well-known location under the user's config directory
    /// (`~/.config/beacon-map/credentials.json`)
    pub fn new() -> Option<Self> {
        home_dir().map(|home| Self {
            path: home
                .join(".config")
                .join("beacon-map")
                .join("credentials.json"),
        })
    }

    /// Uses an explicit path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> crate::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let file: CredentialFile = serde_json::from_str(&raw)?;
        Ok(Some(file.token))
    }

    fn save(&mut self, token: &str) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&CredentialFile {
            token: token.to_string(),
        })?;
        std::fs::write(&self.path, raw)?;
        log::debug!("credential persisted to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and embedders with their own persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with an already persisted credential
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> crate::Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> crate::Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }
}
