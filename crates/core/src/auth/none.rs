use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Open gate selected with `method = "none"`.
///
/// Every caller becomes the anonymous identity, tagged with a `source_ip`
/// claim. Downloads recorded through it keep the payload's `userId`, or an
/// empty one.
#[derive(Debug, Default)]
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let mut identity = Identity::anonymous();
        identity.claims.insert(
            "source_ip".to_string(),
            serde_json::Value::from(request.source_ip.to_string()),
        );
        Ok(identity)
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
