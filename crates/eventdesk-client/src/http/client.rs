//! Authenticated API client.
//!
//! Every call to the backend goes through [`ApiClient::send`]: bearer token
//! injection on the way out, status triage on the way back. A 401 tears the
//! session down and sends the navigator to the login screen before the
//! caller sees [`ClientError::Unauthorized`].

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::body::ResponseBody;
use crate::auth::AuthSessionManager;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::routing::{Location, Navigator};

/// One outbound call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Append a single query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append every non-null field of a serializable struct as a query
    /// parameter.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> ClientResult<Self> {
        match serde_json::to_value(query)? {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        serde_json::Value::Null => {}
                        serde_json::Value::String(s) => self.query.push((key, s)),
                        other => self.query.push((key, other.to_string())),
                    }
                }
                Ok(self)
            }
            serde_json::Value::Null => Ok(self),
            other => Err(ClientError::Decode(format!(
                "query parameters must be an object, got {}",
                other
            ))),
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// HTTP client for the EventDesk backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<AuthSessionManager>,
    navigator: Arc<dyn Navigator>,
    login: Location,
}

impl ApiClient {
    /// Create a client. `navigator` receives the login location whenever
    /// the backend rejects the session.
    pub fn new(
        config: &ClientConfig,
        session: Arc<AuthSessionManager>,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
            login: Location::parse(&config.routes.login),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<AuthSessionManager> {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub async fn get(&self, endpoint: &str) -> ClientResult<ResponseBody> {
        self.send(ApiRequest::get(endpoint)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> ClientResult<ResponseBody> {
        let mut request = ApiRequest::post(endpoint);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(request).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> ClientResult<ResponseBody> {
        let mut request = ApiRequest::put(endpoint);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(request).await
    }

    pub async fn delete(&self, endpoint: &str) -> ClientResult<ResponseBody> {
        self.send(ApiRequest::delete(endpoint)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.get(endpoint).await?.json()
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(endpoint, body).await?.json()
    }

    pub async fn put_json<B, T>(&self, endpoint: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.put(endpoint, body).await?.json()
    }

    pub async fn post_text<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> ClientResult<String> {
        Ok(self.post(endpoint, body).await?.text())
    }

    pub async fn delete_text(&self, endpoint: &str) -> ClientResult<String> {
        Ok(self.delete(endpoint).await?.text())
    }

    /// Send `request` and decode a JSON body into `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        self.send(request).await?.json()
    }

    /// Send `request` and return the body as text.
    pub async fn send_text(&self, request: ApiRequest) -> ClientResult<String> {
        Ok(self.send(request).await?.text())
    }

    /// Send a request through the shared auth and error handling.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<ResponseBody> {
        let url = self.url(&request.endpoint);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.token().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, endpoint = %request.endpoint, "API request");

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(endpoint = %request.endpoint, error = %e, "No response from backend");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.reject_session(&request).await);
        }

        if status.is_success() {
            return ResponseBody::read(response).await;
        }

        let error = match ResponseBody::read(response).await {
            Ok(body) => match body.error_message() {
                Some(message) => ClientError::Request {
                    status: status.as_u16(),
                    message,
                },
                None => ClientError::request_failed(status.as_u16()),
            },
            Err(_) => ClientError::request_failed(status.as_u16()),
        };
        tracing::debug!(endpoint = %request.endpoint, status = status.as_u16(), error = %error, "API request failed");
        Err(error)
    }

    /// Server no longer accepts the credential: clear, navigate, report.
    async fn reject_session(&self, request: &ApiRequest) -> ClientError {
        tracing::warn!(
            method = %request.method,
            endpoint = %request.endpoint,
            "Backend rejected the session, signing out"
        );
        if let Err(e) = self.session.clear_auth().await {
            tracing::error!(error = %e, "Failed to clear session after 401");
        }
        self.navigator.navigate(&self.login);
        ClientError::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::testing::token_expiring_at;
    use crate::auth::{Credentials, MemorySessionStore, Profile, SessionStore};
    use crate::routing::NavigationLog;
    use crate::testing::{spawn_backend, unused_base_url};
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::sync::Mutex;

    struct Harness {
        client: ApiClient,
        manager: Arc<AuthSessionManager>,
        store: Arc<MemorySessionStore>,
        navigator: Arc<NavigationLog>,
    }

    fn harness(base_url: &str) -> Harness {
        let store = Arc::new(MemorySessionStore::new());
        let manager = Arc::new(AuthSessionManager::new(store.clone()));
        let navigator = Arc::new(NavigationLog::new());
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        let client = ApiClient::new(&config, manager.clone(), navigator.clone()).unwrap();
        Harness {
            client,
            manager,
            store,
            navigator,
        }
    }

    async fn sign_in(manager: &AuthSessionManager) -> String {
        let token = token_expiring_at(chrono::Utc::now().timestamp() + 3600);
        manager
            .set_auth(Credentials {
                token: token.clone(),
                user_id: 7,
                profile: Profile::Admin,
            })
            .await
            .unwrap();
        token
    }

    async fn echo_headers(headers: HeaderMap) -> Json<serde_json::Value> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        Json(serde_json::json!({
            "authorization": get("authorization"),
            "content_type": get("content-type"),
        }))
    }

    #[tokio::test]
    async fn test_bearer_and_content_type_headers() {
        let base = spawn_backend(Router::new().route("/api/echo", get(echo_headers))).await;
        let h = harness(&base);

        let body = h.client.get("/api/echo").await.unwrap();
        let echoed: serde_json::Value = body.json().unwrap();
        assert_eq!(echoed["authorization"], serde_json::Value::Null);
        assert_eq!(echoed["content_type"], "application/json");

        let token = sign_in(&h.manager).await;
        let echoed: serde_json::Value = h.client.get("/api/echo").await.unwrap().json().unwrap();
        assert_eq!(echoed["authorization"], format!("Bearer {}", token));
    }

    #[tokio::test]
    async fn test_mid_session_401_clears_navigates_and_fails() {
        // Navigator that snapshots the store at the moment it is called
        struct Snapshotting {
            store: Arc<MemorySessionStore>,
            seen_empty: Mutex<Vec<bool>>,
            log: NavigationLog,
        }
        impl Navigator for Snapshotting {
            fn navigate(&self, to: &Location) {
                let empty = self.store.load().map(|e| e.is_empty()).unwrap_or(false);
                self.seen_empty.lock().unwrap().push(empty);
                self.log.navigate(to);
            }
        }

        let base = spawn_backend(Router::new().route(
            "/api/event/datatable",
            get(|| async { (axum::http::StatusCode::UNAUTHORIZED, "expired") }),
        ))
        .await;

        let store = Arc::new(MemorySessionStore::new());
        let manager = Arc::new(AuthSessionManager::new(store.clone()));
        let navigator = Arc::new(Snapshotting {
            store: store.clone(),
            seen_empty: Mutex::new(Vec::new()),
            log: NavigationLog::new(),
        });
        let mut config = ClientConfig::default();
        config.api.base_url = base;
        let client = ApiClient::new(&config, manager.clone(), navigator.clone()).unwrap();

        sign_in(&manager).await;
        assert!(!store.load().unwrap().is_empty());

        let err = client
            .send(ApiRequest::get("/api/event/datatable").param("page", 0))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(store.load().unwrap().is_empty());
        assert!(!manager.is_authenticated().await);
        assert_eq!(navigator.log.history(), vec![Location::new("/login")]);
        // Session was already gone when navigation happened
        assert_eq!(*navigator.seen_empty.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_plain_text_success_is_returned_unmodified() {
        let base = spawn_backend(Router::new().route(
            "/api/auth/forgot-password",
            post(|| async { "Recovery email sent to ana@example.com" }),
        ))
        .await;
        let h = harness(&base);

        let body = h
            .client
            .post("/api/auth/forgot-password", Some(&serde_json::json!({ "email": "ana@example.com" })))
            .await
            .unwrap();
        assert_eq!(
            body,
            ResponseBody::Text("Recovery email sent to ana@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_error_statuses_carry_server_message() {
        let app = Router::new()
            .route(
                "/api/json-error",
                get(|| async {
                    (
                        axum::http::StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "message": "Title is required" })),
                    )
                }),
            )
            .route(
                "/api/text-error",
                get(|| async { (axum::http::StatusCode::CONFLICT, "Email already registered") }),
            )
            .route(
                "/api/bare-error",
                get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let base = spawn_backend(app).await;
        let h = harness(&base);

        match h.client.get("/api/json-error").await.unwrap_err() {
            ClientError::Request { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Title is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        match h.client.get("/api/text-error").await.unwrap_err() {
            ClientError::Request { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Email already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        match h.client.get("/api/bare-error").await.unwrap_err() {
            ClientError::Request { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // None of these touch the session or navigate
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let h = harness(&unused_base_url().await);
        sign_in(&h.manager).await;

        let err = h.client.get("/api/event/list").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        // A missing response is not a rejected credential
        assert!(h.manager.is_authenticated().await);
        assert!(!h.store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_and_body_are_sent() {
        async fn echo(
            axum::extract::RawQuery(query): axum::extract::RawQuery,
            Json(body): Json<serde_json::Value>,
        ) -> Json<serde_json::Value> {
            Json(serde_json::json!({ "query": query, "body": body }))
        }
        let base = spawn_backend(Router::new().route("/api/echo", axum::routing::put(echo))).await;
        let h = harness(&base);

        #[derive(Serialize)]
        struct Filter {
            keyword: String,
            page: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            order: Option<String>,
        }

        let request = ApiRequest::put("/api/echo")
            .query(&Filter {
                keyword: "boda".to_string(),
                page: 2,
                order: None,
            })
            .unwrap()
            .json(&serde_json::json!({ "title": "Boda Ana & Luis" }))
            .unwrap();
        let echoed: serde_json::Value = h.client.send(request).await.unwrap().json().unwrap();

        assert_eq!(echoed["query"], "keyword=boda&page=2");
        assert_eq!(echoed["body"]["title"], "Boda Ana & Luis");
    }

    #[test]
    fn test_query_skips_nulls() {
        let request = ApiRequest::get("/x")
            .query(&serde_json::json!({ "a": null, "b": 3, "c": "x y" }))
            .unwrap();
        assert_eq!(
            request.query_pairs(),
            &[("b".to_string(), "3".to_string()), ("c".to_string(), "x y".to_string())]
        );
        assert!(ApiRequest::get("/x").query(&5).is_err());
    }

    #[tokio::test]
    async fn test_cancelled_scope_abandons_slow_response() {
        let app = Router::new().route(
            "/api/events/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(serde_json::json!({ "title": "late" }))
            }),
        );
        let h = harness(&spawn_backend(app).await);
        sign_in(&h.manager).await;

        let (handle, scope) = crate::http::request_scope();
        let client = h.client.clone();
        let pending = tokio::spawn(async move {
            scope
                .run(client.send(ApiRequest::get("/api/events/slow")))
                .await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ClientError::Cancelled)));
        // Abandoning a call is not a sign-out.
        assert!(h.manager.is_authenticated().await);
        assert!(h.navigator.history().is_empty());
    }
}
