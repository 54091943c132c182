//! EventDesk Client Library
//!
//! Authenticated access to the EventDesk event-management backend.
//!
//! This crate provides:
//!
//! - **Session management**: bearer-token sessions persisted across runs,
//!   with client-side expiry checks
//! - **Request pipeline**: bearer injection, content-type aware responses and
//!   automatic sign-out when the backend answers 401
//! - **Route guard**: decides whether a view may be shown to the current
//!   session and where to go instead
//! - **Services**: typed calls for auth, events, guests, users and catalogs
//! - **Validation**: form checks that run before anything is sent
//!
//! ## Modules
//!
//! - [`auth`]: Token decoding, session store and session manager
//! - [`config`]: Configuration from file and environment variables
//! - [`error`]: Client error type
//! - [`http`]: API client and request scopes
//! - [`models`]: Backend wire types
//! - [`routing`]: Locations, routes and the route guard
//! - [`services`]: Typed backend calls
//! - [`validation`]: Form validation
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_client::{ClientConfig, EventDesk, NavigationLog};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let desk = EventDesk::start(ClientConfig::load()?, Arc::new(NavigationLog::new())).await?;
//!     desk.auth().sign_in("ana@example.com", "Secreto123").await?;
//!     let page = desk.events().page(&Default::default()).await?;
//!     println!("{} events", page.total_elements);
//!     desk.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routing;
pub mod services;
pub mod validation;

#[cfg(test)]
mod testing;

pub use app::EventDesk;
pub use auth::{AuthSessionManager, AuthState, Credentials, Profile, Session};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{request_scope, ApiClient, ApiRequest, RequestScope, ResponseBody, ScopeHandle};
pub use routing::{GuardDecision, Location, LoginRedirect, NavigationLog, Navigator, Route, RouteGuard};
pub use validation::FieldErrors;
