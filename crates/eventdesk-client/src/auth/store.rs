//! Session persistence.
//!
//! Stores are passive: they keep four string entries and nothing else. All
//! interpretation (parsing, expiry, partial-session handling) belongs to the
//! [`AuthSessionManager`](super::AuthSessionManager).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "auth.token";
pub const USER_ID_KEY: &str = "auth.userId";
pub const PROFILE_KEY: &str = "auth.profile";
pub const EXPIRES_AT_KEY: &str = "auth.expiresAt";

/// Raw persisted session entries, all stored as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntries {
    #[serde(rename = "auth.token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "auth.userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "auth.profile", default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(rename = "auth.expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl SessionEntries {
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
            && self.user_id.is_none()
            && self.profile.is_none()
            && self.expires_at.is_none()
    }

    /// Entries as a key-value map, keyed by the storage names.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        let pairs = [
            (TOKEN_KEY, &self.token),
            (USER_ID_KEY, &self.user_id),
            (PROFILE_KEY, &self.profile),
            (EXPIRES_AT_KEY, &self.expires_at),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                map.insert(key, value.clone());
            }
        }
        map
    }
}

/// Durable key-value persistence for the session entries.
pub trait SessionStore: Send + Sync {
    /// Read whatever entries are currently persisted.
    fn load(&self) -> ClientResult<SessionEntries>;

    /// Replace all persisted entries in one step.
    fn save(&self, entries: &SessionEntries) -> ClientResult<()>;

    /// Remove all persisted entries.
    fn clear(&self) -> ClientResult<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<SessionEntries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with entries, as if left behind by an earlier run.
    pub fn with_entries(entries: SessionEntries) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, SessionEntries>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<SessionEntries> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, entries: &SessionEntries) -> ClientResult<()> {
        *self.lock()? = entries.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.lock()? = SessionEntries::default();
        Ok(())
    }
}

/// YAML file store, by default `~/.eventdesk/session.yaml`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the home directory.
    pub fn default_location() -> ClientResult<Self> {
        Ok(Self::new(default_session_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.yaml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<SessionEntries> {
        if !self.path.exists() {
            return Ok(SessionEntries::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SessionEntries::default());
        }
        match serde_yaml::from_str::<SessionEntries>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // An unreadable file is an absent session
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(SessionEntries::default())
            }
        }
    }

    fn save(&self, entries: &SessionEntries) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(entries)?;
        let tmp = self.temp_path();
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `~/.eventdesk/session.yaml`
pub fn default_session_path() -> ClientResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ClientError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".eventdesk").join("session.yaml"))
}
