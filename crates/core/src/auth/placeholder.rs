//! Development-only bearer token gate.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{bearer_token, AuthError, AuthRequest, Authenticator, Identity};

/// User id handed out to every accepted token.
pub const PLACEHOLDER_USER_ID: &str = "user_001";

/// Token that is always rejected.
const REJECTED_TOKEN: &str = "invalid";

/// Accepts any non-empty bearer token other than `invalid` and maps it to
/// [`PLACEHOLDER_USER_ID`]. Tokens are not verified in any way; swap in a real
/// [`Authenticator`] before exposing the service.
pub struct PlaceholderAuthenticator;

impl PlaceholderAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlaceholderAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for PlaceholderAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        if !request.headers.contains_key("authorization") {
            return Err(AuthError::NotAuthenticated);
        }

        let token = bearer_token(request).ok_or_else(|| {
            AuthError::InvalidCredentials("Malformed Authorization header".to_string())
        })?;

        if token.is_empty() || token == REJECTED_TOKEN {
            return Err(AuthError::InvalidCredentials("Invalid token".to_string()));
        }

        Ok(Identity {
            user_id: PLACEHOLDER_USER_ID.to_string(),
            method: "placeholder".to_string(),
            claims: HashMap::new(),
        })
    }

    fn method_name(&self) -> &'static str {
        "placeholder"
    }
}
