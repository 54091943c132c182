//! User administration.

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, ApiRequest};
use crate::models::{Page, SelectClient, SortOrder, TableQuery, User};
use crate::validation::{FieldErrors, FormMode, UserForm};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct UsersService {
    api: ApiClient,
}

/// Fill in the parameters the users table always sends.
fn with_defaults(query: &TableQuery) -> TableQuery {
    TableQuery {
        keyword: Some(query.keyword.clone().unwrap_or_default()),
        sort_by: Some(query.sort_by.clone().unwrap_or_else(|| "id".to_string())),
        order: Some(query.order.unwrap_or(SortOrder::Desc)),
        page: Some(query.page.unwrap_or(0)),
        size: Some(query.size.unwrap_or(DEFAULT_PAGE_SIZE)),
    }
}

fn wrong_mode(expected: &str) -> ClientError {
    let mut errors = FieldErrors::new();
    errors.add("form", format!("Form is not in {} mode", expected));
    ClientError::Validation(errors)
}

impl UsersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Register a user. `existing` is checked for duplicate emails.
    pub async fn create(&self, form: &UserForm, existing: &[User]) -> ClientResult<User> {
        if form.mode != FormMode::Create {
            return Err(wrong_mode("create"));
        }
        form.validate(existing).map_err(ClientError::Validation)?;
        self.api
            .post_json("/api/user/register-user", Some(&form.to_create_data()))
            .await
    }

    pub async fn page(&self, query: &TableQuery) -> ClientResult<Page<User>> {
        let request = ApiRequest::get("/api/user/get-all").query(&with_defaults(query))?;
        self.api.send_json(request).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<User> {
        self.api.get_json(&format!("/api/user/get/{}", id)).await
    }

    pub async fn update(&self, form: &UserForm, existing: &[User]) -> ClientResult<User> {
        if form.mode != FormMode::Edit {
            return Err(wrong_mode("edit"));
        }
        form.validate(existing).map_err(ClientError::Validation)?;
        self.api
            .put_json("/api/user/update", Some(&form.to_update_data()))
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<String> {
        self.api
            .delete_text(&format!("/api/user/delete-user/{}", id))
            .await
    }

    /// Client accounts for owner pickers.
    pub async fn select_clients(&self) -> ClientResult<Vec<SelectClient>> {
        self.api.get_json("/api/user/select-clients").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSessionManager, MemorySessionStore, Profile};
    use crate::config::ClientConfig;
    use crate::models::Person;
    use crate::routing::NavigationLog;
    use crate::testing::{spawn_backend, unused_base_url};
    use axum::extract::Query;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn service(base_url: &str) -> UsersService {
        let manager = Arc::new(AuthSessionManager::new(Arc::new(MemorySessionStore::new())));
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        let api = ApiClient::new(&config, manager, Arc::new(NavigationLog::new())).unwrap();
        UsersService::new(api)
    }

    fn user_json(id: i64, email: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "email": email,
            "person": {
                "id": id * 10,
                "name": "Luis",
                "paternalSurname": "Pérez",
                "maternalSurname": "",
                "stateCode": "33",
                "phone": "5512345678"
            },
            "profile": "CLIENT"
        })
    }

    #[test]
    fn test_table_defaults() {
        let query = with_defaults(&TableQuery::default());
        assert_eq!(query.keyword.as_deref(), Some(""));
        assert_eq!(query.sort_by.as_deref(), Some("id"));
        assert_eq!(query.order, Some(SortOrder::Desc));
        assert_eq!(query.page, Some(0));
        assert_eq!(query.size, Some(10));

        let query = with_defaults(&TableQuery::page(3, 25).keyword("ana"));
        assert_eq!(query.keyword.as_deref(), Some("ana"));
        assert_eq!(query.page, Some(3));
        assert_eq!(query.size, Some(25));
    }

    #[tokio::test]
    async fn test_page_always_sends_defaults() {
        let app = Router::new().route(
            "/api/user/get-all",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("keyword").map(String::as_str), Some(""));
                assert_eq!(params.get("sortBy").map(String::as_str), Some("id"));
                assert_eq!(params.get("order").map(String::as_str), Some("DESC"));
                assert_eq!(params.get("page").map(String::as_str), Some("0"));
                assert_eq!(params.get("size").map(String::as_str), Some("10"));
                Json(serde_json::json!({
                    "content": [user_json(4, "luis@example.com")],
                    "totalElements": 1,
                    "totalPages": 1,
                    "number": 0,
                    "size": 10
                }))
            }),
        );
        let users = service(&spawn_backend(app).await);

        let page = users.page(&TableQuery::default()).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].profile, Profile::Client);
        assert_eq!(page.content[0].full_name(), "Luis Pérez");
    }

    #[tokio::test]
    async fn test_create_sends_register_body() {
        let app = Router::new().route(
            "/api/user/register-user",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["password"], "Secreto123");
                assert_eq!(body["paternalSurname"], "Pérez");
                Json(user_json(9, body["email"].as_str().unwrap_or_default()))
            }),
        );
        let users = service(&spawn_backend(app).await);

        let form = UserForm {
            email: "nuevo@example.com".to_string(),
            name: "Luis".to_string(),
            paternal_surname: "Pérez".to_string(),
            state_code: "33".to_string(),
            profile: Some(Profile::Client),
            new_password: "Secreto123".to_string(),
            confirm_password: "Secreto123".to_string(),
            ..UserForm::default()
        };
        let created = users.create(&form, &[]).await.unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(created.email, "nuevo@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_blocks_request() {
        let users = service(&unused_base_url().await);
        let existing = User {
            id: 4,
            email: "luis@example.com".to_string(),
            person: Person {
                id: 40,
                name: "Luis".to_string(),
                paternal_surname: "Pérez".to_string(),
                maternal_surname: String::new(),
                state_code: "33".to_string(),
                phone: String::new(),
            },
            profile: Profile::Client,
        };
        let form = UserForm {
            email: "LUIS@example.com".to_string(),
            name: "Otro".to_string(),
            paternal_surname: "López".to_string(),
            state_code: "33".to_string(),
            profile: Some(Profile::Client),
            new_password: "Secreto123".to_string(),
            confirm_password: "Secreto123".to_string(),
            ..UserForm::default()
        };

        match users.create(&form, &[existing]).await {
            Err(ClientError::Validation(errors)) => {
                assert_eq!(errors.get("email"), Some("Email is already in use"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    fn existing_user() -> User {
        User {
            id: 4,
            email: "luis@example.com".to_string(),
            person: Person {
                id: 40,
                name: "Luis".to_string(),
                paternal_surname: "Pérez".to_string(),
                maternal_surname: String::new(),
                state_code: "33".to_string(),
                phone: String::new(),
            },
            profile: Profile::Client,
        }
    }

    async fn capture_update() -> (UsersService, Arc<Mutex<Option<serde_json::Value>>>) {
        let captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();
        let app = Router::new().route(
            "/api/user/update",
            put(move |Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body);
                    Json(user_json(4, "luis@example.com"))
                }
            }),
        );
        (service(&spawn_backend(app).await), captured)
    }

    #[tokio::test]
    async fn test_update_sends_new_password() {
        let (users, captured) = capture_update().await;
        let existing = existing_user();
        let mut form = UserForm::edit(&existing);
        form.new_password = "NuevoSecreto1".to_string();
        form.confirm_password = "NuevoSecreto1".to_string();

        users.update(&form, &[existing]).await.unwrap();

        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(body["id"], 4);
        assert_eq!(body["password"].as_str(), Some("NuevoSecreto1"));
    }

    #[tokio::test]
    async fn test_update_without_password_omits_it() {
        let (users, captured) = capture_update().await;
        let existing = existing_user();
        let form = UserForm::edit(&existing);

        users.update(&form, &[existing]).await.unwrap();

        let body = captured.lock().unwrap().clone().unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["email"], "luis@example.com");
    }
}
