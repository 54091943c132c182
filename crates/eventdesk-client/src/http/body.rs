//! Response bodies, tagged by content type.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// A decoded response body. JSON when the server said
/// `application/json`, plain text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Deserialize a JSON body into `T`.
    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::Decode(format!("unexpected response shape: {}", e))),
            ResponseBody::Text(text) => Err(ClientError::Decode(format!(
                "expected a JSON body, got text: {}",
                preview(&text)
            ))),
        }
    }

    /// The body as a human-readable string. A JSON string value is
    /// unwrapped; other JSON is rendered compactly.
    pub fn text(self) -> String {
        match self {
            ResponseBody::Text(text) => text,
            ResponseBody::Json(serde_json::Value::String(text)) => text,
            ResponseBody::Json(value) => value.to_string(),
        }
    }

    /// Server-provided failure message, if the body carries one.
    pub(crate) fn error_message(&self) -> Option<String> {
        let message = match self {
            ResponseBody::Json(value) => value.get("message").and_then(|m| m.as_str()),
            ResponseBody::Text(text) => Some(text.as_str()),
        }?;
        let message = message.trim();
        (!message.is_empty()).then(|| message.to_string())
    }

    /// Read and decode a response according to its content type.
    pub(crate) async fn read(response: reqwest::Response) -> ClientResult<Self> {
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("failed reading response body: {}", e)))?;

        if is_json {
            serde_json::from_str(&text)
                .map(ResponseBody::Json)
                .map_err(|e| ClientError::Decode(format!("invalid JSON body: {}", e)))
        } else {
            Ok(ResponseBody::Text(text))
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(80).collect();
    if text.chars().count() > 80 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        id: i64,
        token: String,
    }

    #[test]
    fn test_json_body_deserializes() {
        let body = ResponseBody::Json(serde_json::json!({ "id": 7, "token": "t" }));
        let login: Login = body.json().unwrap();
        assert_eq!(login.id, 7);
        assert_eq!(login.token, "t");
    }

    #[test]
    fn test_text_body_is_not_json() {
        let body = ResponseBody::Text("Email sent".to_string());
        assert!(matches!(body.json::<Login>(), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_text_unwraps_json_strings() {
        assert_eq!(ResponseBody::Text("ok".into()).text(), "ok");
        assert_eq!(ResponseBody::Json(serde_json::json!("deleted")).text(), "deleted");
        assert_eq!(ResponseBody::Json(serde_json::json!({"a": 1})).text(), r#"{"a":1}"#);
    }

    #[test]
    fn test_error_message_extraction() {
        let json = ResponseBody::Json(serde_json::json!({ "message": "Title is required" }));
        assert_eq!(json.error_message().as_deref(), Some("Title is required"));

        let no_message = ResponseBody::Json(serde_json::json!({ "error": "x" }));
        assert_eq!(no_message.error_message(), None);

        assert_eq!(ResponseBody::Text("  ".into()).error_message(), None);
        assert_eq!(
            ResponseBody::Text("Already exists".into()).error_message().as_deref(),
            Some("Already exists")
        );
    }
}
