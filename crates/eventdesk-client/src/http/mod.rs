//! Request pipeline: auth injection, response triage, cancellation.

mod body;
mod client;
mod scope;

pub use body::ResponseBody;
pub use client::{ApiClient, ApiRequest};
pub use scope::{request_scope, RequestScope, ScopeHandle};
