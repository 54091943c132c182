//! Session lifecycle: token decoding, persistence and the session manager.

pub mod manager;
pub mod store;
pub mod token;

pub use manager::{
    AuthSessionManager, AuthState, Clock, Credentials, FixedClock, Profile, Session, SystemClock,
};
pub use store::{FileSessionStore, MemorySessionStore, SessionEntries, SessionStore};
pub use token::{decode_claims, decode_expiry, TokenClaims};
