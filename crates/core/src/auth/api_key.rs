//! Shared API key gate for download recording.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{bearer_token, AuthError, AuthRequest, Authenticator, Identity};

/// Header carrying the key when no bearer token is sent.
const API_KEY_HEADER: &str = "x-api-key";

/// Where the presented key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySource {
    Bearer,
    Header,
}

impl KeySource {
    fn as_str(self) -> &'static str {
        match self {
            KeySource::Bearer => "bearer",
            KeySource::Header => "x_api_key",
        }
    }
}

/// Admits callers presenting the configured key and stamps them with a fixed
/// user id, so downloads recorded without an explicit `userId` still say who
/// made them.
///
/// The key is read from `Authorization: Bearer <key>`, falling back to
/// `X-API-Key: <key>`. The identity's `key_source` claim tells which one was
/// used.
pub struct ApiKeyAuthenticator {
    key: String,
    user_id: String,
}

impl ApiKeyAuthenticator {
    pub fn new(key: String, user_id: String) -> Self {
        Self { key, user_id }
    }

    fn presented_key<'a>(request: &'a AuthRequest) -> Option<(&'a str, KeySource)> {
        if let Some(token) = bearer_token(request) {
            return Some((token, KeySource::Bearer));
        }
        request
            .headers
            .get(API_KEY_HEADER)
            .map(|key| (key.as_str(), KeySource::Header))
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let (presented, source) =
            Self::presented_key(request).ok_or(AuthError::NotAuthenticated)?;

        if !keys_match(presented.as_bytes(), self.key.as_bytes()) {
            return Err(AuthError::InvalidCredentials("Invalid API key".to_string()));
        }

        Ok(Identity {
            user_id: self.user_id.clone(),
            method: self.method_name().to_string(),
            claims: HashMap::from([(
                "key_source".to_string(),
                serde_json::Value::from(source.as_str()),
            )]),
        })
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}

/// Compare without short-circuiting on the first differing byte.
fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
