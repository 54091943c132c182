//! Wiring of one client instance: configuration, session, pipeline, guard
//! and services sharing a single session manager.

use std::sync::Arc;

use crate::auth::{AuthSessionManager, AuthState};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::routing::{Navigator, RouteGuard};
use crate::services::{AuthService, CatalogsService, EventsService, GuestsService, UsersService};

pub struct EventDesk {
    config: ClientConfig,
    session: Arc<AuthSessionManager>,
    api: ApiClient,
    guard: RouteGuard,
}

impl EventDesk {
    /// Build the client and hydrate the session from its store.
    pub async fn start(config: ClientConfig, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let store = config.session.open_store()?;
        let session = Arc::new(AuthSessionManager::new(store));
        if let AuthState::Anonymous = session.init().await? {
            tracing::debug!("No stored session");
        }
        Self::with_session(config, session, navigator)
    }

    /// Build around an existing manager. The manager is not hydrated.
    pub fn with_session(
        config: ClientConfig,
        session: Arc<AuthSessionManager>,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let api = ApiClient::new(&config, session.clone(), navigator)?;
        let guard = RouteGuard::new(session.clone(), &config.routes);
        Ok(Self {
            config,
            session,
            api,
            guard,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<AuthSessionManager> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone())
    }

    pub fn events(&self) -> EventsService {
        EventsService::new(self.api.clone())
    }

    pub fn guests(&self) -> GuestsService {
        GuestsService::new(self.api.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.api.clone())
    }

    pub fn catalogs(&self) -> CatalogsService {
        CatalogsService::new(self.api.clone())
    }

    pub async fn shutdown(&self) {
        self.session.shutdown().await;
    }
}
