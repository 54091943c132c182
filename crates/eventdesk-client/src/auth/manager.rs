//! Auth session manager.
//!
//! Single owner of the session: every write to the session store goes
//! through [`AuthSessionManager`]. Other components only read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::{SessionEntries, SessionStore};
use super::token::{self, token_prefix};
use crate::error::{ClientError, ClientResult};

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// User role label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Profile {
    Admin,
    Client,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Admin => "ADMIN",
            Profile::Client => "CLIENT",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Profile::Admin),
            "CLIENT" => Ok(Profile::Client),
            other => Err(ClientError::InvalidResponse(format!("unknown profile '{}'", other))),
        }
    }
}

/// What a successful login hands to [`AuthSessionManager::set_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: i64,
    pub profile: Profile,
}

/// A complete, usable session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub profile: Profile,
    /// `None` when the token carries no expiry claim.
    pub expires_at: Option<i64>,
}

impl Session {
    /// Expired when the expiry is at or before `now`. Without a stored expiry
    /// the token is decoded again; an undecodable token counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        let expires_at = match self.expires_at {
            Some(exp) => Some(exp),
            None => match token::decode_expiry(&self.token) {
                Ok(exp) => exp,
                Err(_) => return true,
            },
        };
        expires_at.is_some_and(|exp| exp <= now)
    }

    fn to_entries(&self) -> SessionEntries {
        SessionEntries {
            token: Some(self.token.clone()),
            user_id: Some(self.user_id.to_string()),
            profile: Some(self.profile.to_string()),
            expires_at: self.expires_at.map(|exp| exp.to_string()),
        }
    }

    /// Rebuild a session from persisted entries. Any missing or corrupt
    /// entry rejects the whole session.
    fn from_entries(entries: &SessionEntries) -> Result<Self, String> {
        let token = entries.token.clone().ok_or("token missing")?;
        let user_id = entries
            .user_id
            .as_deref()
            .ok_or("userId missing")?
            .parse::<i64>()
            .map_err(|e| format!("userId unreadable: {}", e))?;
        let profile = entries
            .profile
            .as_deref()
            .ok_or("profile missing")?
            .parse::<Profile>()
            .map_err(|e| e.to_string())?;

        let decoded = token::decode_expiry(&token).map_err(|e| e.to_string())?;
        let expires_at = match entries.expires_at.as_deref() {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|e| format!("expiresAt unreadable: {}", e))?,
            ),
            None => decoded,
        };

        Ok(Self {
            token,
            user_id,
            profile,
            expires_at,
        })
    }
}

/// In-memory session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Owner of the session lifecycle.
pub struct AuthSessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    state: RwLock<AuthState>,
}

impl AuthSessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            state: RwLock::new(AuthState::Anonymous),
        }
    }

    /// Hydrate in-memory state from the store. A stored session that is
    /// expired, undecodable or incomplete is cleared.
    pub async fn init(&self) -> ClientResult<AuthState> {
        let entries = self.store.load()?;
        let mut state = self.state.write().await;

        if entries.is_empty() {
            *state = AuthState::Anonymous;
            return Ok(AuthState::Anonymous);
        }

        match Session::from_entries(&entries) {
            Ok(session) if !session.is_expired_at(self.clock.now()) => {
                tracing::info!(
                    user_id = session.user_id,
                    profile = %session.profile,
                    "Restored session"
                );
                *state = AuthState::Authenticated(session);
            }
            Ok(session) => {
                tracing::info!(
                    user_id = session.user_id,
                    expires_at = ?session.expires_at,
                    "Stored session expired, clearing"
                );
                self.store.clear()?;
                *state = AuthState::Anonymous;
            }
            Err(reason) => {
                tracing::warn!(%reason, "Discarding unusable stored session");
                self.store.clear()?;
                *state = AuthState::Anonymous;
            }
        }

        Ok(state.clone())
    }

    /// Persist a fresh session from login credentials.
    pub async fn set_auth(&self, credentials: Credentials) -> ClientResult<Session> {
        let expires_at = token::decode_expiry(&credentials.token)?;
        let session = Session {
            token: credentials.token,
            user_id: credentials.user_id,
            profile: credentials.profile,
            expires_at,
        };

        let mut state = self.state.write().await;
        self.store.save(&session.to_entries())?;
        *state = AuthState::Authenticated(session.clone());

        tracing::info!(
            user_id = session.user_id,
            profile = %session.profile,
            token = token_prefix(&session.token),
            "Session established"
        );
        Ok(session)
    }

    /// Drop the session everywhere. Safe to call when already logged out.
    pub async fn clear_auth(&self) -> ClientResult<()> {
        let mut state = self.state.write().await;
        self.store.clear()?;
        if state.is_authenticated() {
            tracing::info!("Session cleared");
        }
        *state = AuthState::Anonymous;
        Ok(())
    }

    /// True when there is no usable token or its expiry has been reached.
    /// Never mutates the session.
    ///
    /// With no session in memory, which is the case before [`init`] and
    /// after [`shutdown`], the answer comes from the persisted entries so a
    /// stored session is judged by its own `auth.expiresAt`.
    ///
    /// [`init`]: Self::init
    /// [`shutdown`]: Self::shutdown
    pub async fn is_token_expired(&self) -> bool {
        let now = self.clock.now();
        {
            let state = self.state.read().await;
            if let AuthState::Authenticated(session) = &*state {
                return session.is_expired_at(now);
            }
        }

        // Nothing in memory: read what is persisted
        match self.store.load() {
            Ok(entries) if entries.is_empty() => true,
            Ok(entries) => match Session::from_entries(&entries) {
                Ok(session) => session.is_expired_at(now),
                Err(_) => true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Session store unreadable");
                true
            }
        }
    }

    /// Forget in-memory state without touching the persisted session.
    pub async fn shutdown(&self) {
        *self.state.write().await = AuthState::Anonymous;
        tracing::debug!("Session manager shut down");
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.session().map(|s| s.token.clone())
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.state.read().await.session().map(|s| s.profile)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}
