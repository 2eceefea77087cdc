mod api_key;
mod none;
mod placeholder;
mod traits;
mod types;

pub use api_key::*;
pub use none::*;
pub use placeholder::*;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Build the authenticator selected in config.
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::ApiKey => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AuthError::ConfigurationError(
                    "api_key must be set when using ApiKey auth method".to_string(),
                )
            })?;
            Ok(Box::new(ApiKeyAuthenticator::new(
                api_key,
                config.api_key_user_id.clone(),
            )))
        }
        AuthMethod::Placeholder => Ok(Box::new(PlaceholderAuthenticator::new())),
    }
}

/// Pull a bearer token out of the `Authorization` header.
pub(crate) fn bearer_token(request: &AuthRequest) -> Option<&str> {
    let header = request.headers.get("authorization")?;
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}
