//! Outbound request authentication.

use tracing::warn;

use authwire_core::{AccessToken, Body, HttpRequest};

use crate::vault::CredentialVault;

const AUTHORIZATION: &str = "authorization";
const CONTENT_TYPE: &str = "content-type";

/// Attaches the stored access token to outgoing requests.
#[derive(Debug, Clone)]
pub(crate) struct Authenticator {
    vault: CredentialVault,
}

impl Authenticator {
    pub(crate) fn new(vault: CredentialVault) -> Self {
        Self { vault }
    }

    /// Prepare `request` with whatever access token is stored.
    ///
    /// Returns the token that was attached. An unreadable store sends the
    /// request unauthenticated.
    pub(crate) async fn authenticate(&self, request: &mut HttpRequest) -> Option<AccessToken> {
        let token = match self.vault.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Credential store unreadable, sending unauthenticated");
                None
            }
        };
        apply(request, token.as_ref());
        token
    }
}

/// Set the bearer header and settle the content type for the body.
pub(crate) fn apply(request: &mut HttpRequest, token: Option<&AccessToken>) {
    if let Some(token) = token {
        request.headers.insert(AUTHORIZATION, token.bearer());
    }

    // Binary and multipart bodies get their content type (and boundary)
    // from the transport.
    if request.body.is_binary() {
        request.headers.remove(CONTENT_TYPE);
    } else if matches!(request.body, Body::Json(_)) && !request.headers.contains(CONTENT_TYPE) {
        request.headers.insert(CONTENT_TYPE, "application/json");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::MemoryCredentialStore;
    use authwire_core::{CredentialPair, Method, Part};

    #[tokio::test]
    async fn attaches_bearer_token() {
        let store = MemoryCredentialStore::with_session(&CredentialPair::new("a1", "r1"), true);
        let authenticator = Authenticator::new(CredentialVault::new(Arc::new(store)));

        let mut request = HttpRequest::new(Method::Get, "https://api.example.com/me");
        let used = authenticator.authenticate(&mut request).await;

        assert_eq!(used, Some(AccessToken::new("a1")));
        assert_eq!(request.headers.get("Authorization"), Some("Bearer a1"));
    }

    #[tokio::test]
    async fn no_token_sends_unauthenticated() {
        let authenticator =
            Authenticator::new(CredentialVault::new(Arc::new(MemoryCredentialStore::new())));

        let mut request = HttpRequest::new(Method::Get, "https://api.example.com/public");
        assert_eq!(authenticator.authenticate(&mut request).await, None);
        assert!(!request.headers.contains("authorization"));
    }

    #[test]
    fn multipart_drops_preset_content_type() {
        let mut request = HttpRequest::new(Method::Post, "https://api.example.com/upload")
            .header("Content-Type", "application/json")
            .body(Body::Multipart(vec![Part::bytes("file", vec![0, 1, 2])]));

        apply(&mut request, Some(&AccessToken::new("a1")));

        assert!(!request.headers.contains("content-type"));
        assert_eq!(request.headers.get("authorization"), Some("Bearer a1"));
    }

    #[test]
    fn json_body_gets_default_content_type() {
        let mut request = HttpRequest::new(Method::Post, "https://api.example.com/items")
            .body(Body::Json(serde_json::json!({"name": "x"})));
        apply(&mut request, None);
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn explicit_content_type_is_kept_for_text() {
        let mut request = HttpRequest::new(Method::Put, "https://api.example.com/notes/1")
            .header("content-type", "text/markdown")
            .body(Body::Text("# hi".into()));
        apply(&mut request, None);
        assert_eq!(request.headers.get("content-type"), Some("text/markdown"));
    }

    #[test]
    fn retry_replaces_stale_bearer() {
        let mut request = HttpRequest::new(Method::Get, "https://api.example.com/me");
        apply(&mut request, Some(&AccessToken::new("a1")));
        apply(&mut request, Some(&AccessToken::new("a2")));
        assert_eq!(request.headers.get("authorization"), Some("Bearer a2"));
    }
}
