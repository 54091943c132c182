//! Bearer token payload decoding.
//!
//! Tokens are issued and verified by the backend. The client only peeks at
//! the payload segment to learn when the token expires; the signature is
//! never checked here.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Claims the client cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    /// Expiry as Unix seconds.
    #[serde(default)]
    pub exp: Option<i64>,

    /// Subject, usually the user's email.
    #[serde(default)]
    pub sub: Option<String>,

    /// Issued-at as Unix seconds.
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decode the payload segment of a JWT-shaped token.
pub fn decode_claims(token: &str) -> ClientResult<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClientError::TokenDecode(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    // Some issuers keep the base64 padding
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ClientError::TokenDecode(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice::<TokenClaims>(&bytes)
        .map_err(|e| ClientError::TokenDecode(format!("payload is not a claims object: {}", e)))
}

/// Extract the expiry claim. `Ok(None)` when the token has no `exp`.
pub fn decode_expiry(token: &str) -> ClientResult<Option<i64>> {
    decode_claims(token).map(|claims| claims.exp)
}

/// Short, log-safe prefix of a token.
pub(crate) fn token_prefix(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(idx, _)| idx)
        .unwrap_or(token.len());
    &token[..end]
}
