//! Login and password recovery.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AuthSessionManager, Credentials, Profile, Session};
use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, ApiRequest};
use crate::validation::{FieldErrors, LoginForm, RecoverPasswordForm};

/// Body returned by `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    #[serde(default)]
    pub token: String,
    pub profile: String,
}

impl TryFrom<LoginResponse> for Credentials {
    type Error = ClientError;

    fn try_from(response: LoginResponse) -> Result<Self, Self::Error> {
        if response.token.is_empty() {
            return Err(ClientError::InvalidResponse("missing token".to_string()));
        }
        let profile: Profile = response.profile.parse()?;
        Ok(Credentials {
            token: response.token,
            user_id: response.id,
            profile,
        })
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn session(&self) -> &Arc<AuthSessionManager> {
        self.api.session()
    }

    /// Exchange credentials for a bearer token. Does not touch the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Credentials> {
        let form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        form.validate().map_err(ClientError::Validation)?;

        let response: LoginResponse = self
            .api
            .post_json(
                "/api/auth/login",
                Some(&LoginBody {
                    email: email.trim(),
                    password,
                }),
            )
            .await?;
        Credentials::try_from(response)
    }

    /// Log in and store the resulting session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let credentials = self.login(email, password).await?;
        self.session().set_auth(credentials).await
    }

    pub async fn sign_out(&self) -> ClientResult<()> {
        self.session().clear_auth().await
    }

    /// Ask the backend to mail a recovery link. Returns the server's
    /// confirmation text.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        if let Some(message) = crate::validation::validate_email(email) {
            let mut errors = FieldErrors::new();
            errors.add("email", message);
            return Err(ClientError::Validation(errors));
        }
        self.api
            .post_text("/api/auth/forgot-password", Some(&EmailBody { email: email.trim() }))
            .await
    }

    /// Set a new password using the token from a recovery link.
    pub async fn recover_password(
        &self,
        token: &str,
        form: &RecoverPasswordForm,
    ) -> ClientResult<String> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/api/auth/recover-password")
            .param("token", token)
            .json(&PasswordBody {
                password: &form.password,
            })?;
        self.api.send_text(request).await
    }
}
