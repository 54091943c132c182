//! Client configuration.
//!
//! Supports loading configuration from:
//! 1. Config file (TOML, JSON, or YAML) named by `EVENTDESK_CONFIG`
//! 2. Environment variables
//!
//! Environment variables take precedence over config file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::error::{ClientError, ClientResult};

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Session persistence configuration
    pub session: SessionConfig,
    /// Well-known navigation targets
    pub routes: RoutesConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL (default: "http://localhost:8080")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

/// Where the session lives between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    File,
    Memory,
}

/// Session persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage backend (default: file)
    pub backend: SessionBackend,
    /// Session file path (default: ~/.eventdesk/session.yaml)
    pub path: Option<PathBuf>,
}

/// Navigation targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Login screen (default: "/login")
    pub login: String,
    /// Landing view after login (default: "/events")
    pub landing: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            landing: "/events".to_string(),
        }
    }
}

impl SessionConfig {
    /// Build the configured store.
    pub fn open_store(&self) -> ClientResult<Arc<dyn SessionStore>> {
        match self.backend {
            SessionBackend::Memory => Ok(Arc::new(MemorySessionStore::new())),
            SessionBackend::File => {
                let store = match &self.path {
                    Some(path) => FileSessionStore::new(path.clone()),
                    None => FileSessionStore::default_location()?,
                };
                tracing::debug!(path = %store.path().display(), "Using file session store");
                Ok(Arc::new(store))
            }
        }
    }
}

impl ClientConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables override file values.
    pub fn load() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Ok(config_path) = std::env::var("EVENTDESK_CONFIG") {
            config = Self::from_file(&config_path)?;
            tracing::info!("Loaded configuration from: {}", config_path);
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a file (supports TOML, JSON, YAML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match extension {
            "toml" => Self::from_toml(&content),
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => {
                // Try to detect format
                if content.trim().starts_with('{') {
                    Self::from_json(&content)
                } else if content.contains("---") || content.contains(": ") {
                    Self::from_yaml(&content)
                } else {
                    Self::from_toml(&content)
                }
            }
        };

        parsed.map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API config
        if let Some(val) = var("EVENTDESK_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = var("EVENTDESK_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.api.timeout_secs = secs;
            }
        }

        // Session config
        if let Some(val) = var("EVENTDESK_SESSION_BACKEND") {
            match val.to_ascii_lowercase().as_str() {
                "memory" => self.session.backend = SessionBackend::Memory,
                "file" => self.session.backend = SessionBackend::File,
                other => tracing::warn!("Ignoring unknown session backend: {}", other),
            }
        }
        if let Some(val) = var("EVENTDESK_SESSION_FILE") {
            self.session.path = Some(PathBuf::from(val));
        }

        // Routes config
        if let Some(val) = var("EVENTDESK_LOGIN_PATH") {
            self.routes.login = val;
        }
        if let Some(val) = var("EVENTDESK_LANDING_PATH") {
            self.routes.landing = val;
        }
    }
}
