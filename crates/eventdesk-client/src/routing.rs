//! Application routes and the route guard.
//!
//! The guard answers one question before a protected view is shown: may the
//! current session see this location? It reads session state and never
//! changes it.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::auth::{AuthSessionManager, Profile};
use crate::config::RoutesConfig;

/// A navigation target: path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    /// Split `"/events?page=2"` into path and query.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('?') {
            Some((path, query)) if !query.is_empty() => Self {
                path: normalize_path(path),
                query: Some(query.to_string()),
            },
            Some((path, _)) => Self::new(normalize_path(path)),
            None => Self::new(normalize_path(raw)),
        }
    }

    pub fn route(&self) -> Route {
        Route::resolve(&self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    };
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Known application views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Login,
    ForgotPassword,
    RecoverPassword { token: String },
    Home,
    Events,
    EventDetail { id: String },
    EventEdit { id: String },
    Catalogs,
    Users,
    Calendar,
    NotFound,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Profile),
}

impl Route {
    pub fn resolve(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Index,
            ["login"] => Route::Login,
            ["forgot-password"] => Route::ForgotPassword,
            ["recover-password", token] => Route::RecoverPassword {
                token: (*token).to_string(),
            },
            ["home"] => Route::Home,
            ["events"] => Route::Events,
            ["events", id] => Route::EventDetail {
                id: (*id).to_string(),
            },
            ["events", id, "edit"] => Route::EventEdit {
                id: (*id).to_string(),
            },
            ["catalogs"] => Route::Catalogs,
            ["users"] => Route::Users,
            ["calendar"] => Route::Calendar,
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Index
            | Route::Login
            | Route::ForgotPassword
            | Route::RecoverPassword { .. }
            | Route::NotFound => Access::Public,
            Route::Users | Route::Catalogs => Access::Role(Profile::Admin),
            Route::Home
            | Route::Events
            | Route::EventDetail { .. }
            | Route::EventEdit { .. }
            | Route::Calendar => Access::Authenticated,
        }
    }
}

/// Receiver of forced navigations.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &Location);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct NavigationLog {
    history: Mutex<Vec<Location>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Location> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Location> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, to: &Location) {
        tracing::debug!(to = %to, "Navigate");
        if let Ok(mut history) = self.history.lock() {
            history.push(to.clone());
        }
    }
}

/// Remembers where the user was headed when sent to login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub login: Location,
    pub from: Location,
}

impl LoginRedirect {
    /// The location originally requested.
    pub fn return_to(&self) -> &Location {
        &self.from
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested view.
    Render(Route),
    /// No usable session; go to login and come back afterwards.
    RedirectToLogin(LoginRedirect),
    /// Session is fine but the view is elsewhere for this profile.
    RedirectTo(Location),
}

/// Gatekeeper for protected views.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<AuthSessionManager>,
    login: Location,
    landing: Location,
}

impl RouteGuard {
    pub fn new(session: Arc<AuthSessionManager>, routes: &RoutesConfig) -> Self {
        Self {
            session,
            login: Location::parse(&routes.login),
            landing: Location::parse(&routes.landing),
        }
    }

    pub fn login(&self) -> &Location {
        &self.login
    }

    pub fn landing(&self) -> &Location {
        &self.landing
    }

    pub async fn check(&self, target: &Location) -> GuardDecision {
        let route = target.route();
        let access = route.access();
        if access == Access::Public {
            return GuardDecision::Render(route);
        }

        let expired = self.session.is_token_expired().await;
        let profile = match self.session.profile().await {
            Some(profile) if !expired => profile,
            _ => {
                tracing::debug!(target = %target, "No usable session, redirecting to login");
                return GuardDecision::RedirectToLogin(LoginRedirect {
                    login: self.login.clone(),
                    from: target.clone(),
                });
            }
        };

        match (route, access) {
            (Route::Home, _) => GuardDecision::RedirectTo(self.landing.clone()),
            (_, Access::Role(required)) if required != profile => {
                tracing::debug!(target = %target, %profile, "Profile lacks access, redirecting");
                GuardDecision::RedirectTo(self.landing.clone())
            }
            (route, _) => GuardDecision::Render(route),
        }
    }

    /// Where to go after a successful login: the originally requested
    /// location when login was reached through a redirect, otherwise the
    /// configured landing.
    pub fn after_login(&self, redirect: Option<&LoginRedirect>) -> Location {
        match redirect {
            Some(redirect) if redirect.from.route().access() != Access::Public => {
                redirect.from.clone()
            }
            _ => self.landing.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::testing::token_expiring_at;
    use crate::auth::{Credentials, FixedClock, MemorySessionStore};

    const NOW: i64 = 1_750_000_000;

    fn guard() -> (RouteGuard, Arc<AuthSessionManager>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(NOW));
        let manager = Arc::new(AuthSessionManager::with_clock(
            Arc::new(MemorySessionStore::new()),
            clock.clone(),
        ));
        let guard = RouteGuard::new(manager.clone(), &RoutesConfig::default());
        (guard, manager, clock)
    }

    async fn login_as(manager: &AuthSessionManager, profile: Profile, exp: i64) {
        manager
            .set_auth(Credentials {
                token: token_expiring_at(exp),
                user_id: 7,
                profile,
            })
            .await
            .unwrap();
    }

    #[test]
    fn test_location_parse_and_display() {
        let loc = Location::parse("/events/abc?tab=guests");
        assert_eq!(loc.path, "/events/abc");
        assert_eq!(loc.query.as_deref(), Some("tab=guests"));
        assert_eq!(loc.to_string(), "/events/abc?tab=guests");

        assert_eq!(Location::parse("users/").path, "/users");
        assert_eq!(Location::parse("/").path, "/");
        assert_eq!(Location::parse("/calendar?").query, None);
    }

    #[test]
    fn test_route_resolution() {
        assert_eq!(Route::resolve("/"), Route::Index);
        assert_eq!(
            Route::resolve("/recover-password/abc123"),
            Route::RecoverPassword {
                token: "abc123".to_string()
            }
        );
        assert_eq!(
            Route::resolve("/events/e-1/edit"),
            Route::EventEdit {
                id: "e-1".to_string()
            }
        );
        assert_eq!(Route::resolve("/nowhere/at/all"), Route::NotFound);
        assert_eq!(Route::Users.access(), Access::Role(Profile::Admin));
        assert_eq!(Route::Calendar.access(), Access::Authenticated);
    }

    #[tokio::test]
    async fn test_anonymous_is_redirected_with_origin() {
        let (guard, _, _) = guard();
        let target = Location::parse("/events/e-1?tab=guests");

        match guard.check(&target).await {
            GuardDecision::RedirectToLogin(redirect) => {
                assert_eq!(redirect.login.path, "/login");
                assert_eq!(redirect.from, target);
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_returns_to_original_location() {
        let (guard, manager, _) = guard();
        let target = Location::parse("/calendar");

        let redirect = match guard.check(&target).await {
            GuardDecision::RedirectToLogin(redirect) => redirect,
            other => panic!("unexpected decision: {other:?}"),
        };

        login_as(&manager, Profile::Client, NOW + 3600).await;
        let next = guard.after_login(Some(&redirect));
        assert_eq!(next, target);
        assert_eq!(guard.check(&next).await, GuardDecision::Render(Route::Calendar));
    }

    #[test]
    fn test_direct_login_lands_on_default() {
        let (guard, _, _) = guard();
        assert_eq!(guard.after_login(None).path, "/events");
    }

    #[tokio::test]
    async fn test_expired_session_is_redirected_but_not_cleared() {
        let (guard, manager, clock) = guard();
        login_as(&manager, Profile::Admin, NOW + 60).await;
        clock.advance(60);

        let decision = guard.check(&Location::new("/events")).await;
        assert!(matches!(decision, GuardDecision::RedirectToLogin(_)));
        // The guard only reads
        assert!(manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_public_routes_always_render() {
        let (guard, _, _) = guard();
        assert_eq!(guard.check(&Location::new("/login")).await, GuardDecision::Render(Route::Login));
        assert!(matches!(
            guard.check(&Location::new("/recover-password/tok")).await,
            GuardDecision::Render(Route::RecoverPassword { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_routes_redirect_clients_to_landing() {
        let (guard, manager, _) = guard();
        login_as(&manager, Profile::Client, NOW + 3600).await;

        assert_eq!(
            guard.check(&Location::new("/users")).await,
            GuardDecision::RedirectTo(Location::new("/events"))
        );

        login_as(&manager, Profile::Admin, NOW + 3600).await;
        assert_eq!(guard.check(&Location::new("/users")).await, GuardDecision::Render(Route::Users));
    }

    #[tokio::test]
    async fn test_home_forwards_to_landing() {
        let (guard, manager, _) = guard();
        login_as(&manager, Profile::Client, NOW + 3600).await;
        assert_eq!(
            guard.check(&Location::new("/home")).await,
            GuardDecision::RedirectTo(Location::new("/events"))
        );
    }

    #[test]
    fn test_navigation_log_records_in_order() {
        let log = NavigationLog::new();
        log.navigate(&Location::new("/events"));
        log.navigate(&Location::new("/login"));
        assert_eq!(log.history().len(), 2);
        assert_eq!(log.last(), Some(Location::new("/login")));
    }
}
