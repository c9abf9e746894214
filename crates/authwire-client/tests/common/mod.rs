//! In-process fake API used by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use authwire_client::{AuthClient, ClientConfig, MemoryCredentialStore};
use authwire_core::error::TransportError;
use authwire_core::{ApiUrl, CredentialPair, HttpRequest, HttpResponse, Transport};

pub const BASE_URL: &str = "https://api.example.com";
pub const REFRESH_URL: &str = "https://api.example.com/auth/refresh";

/// How the fake refresh endpoint answers.
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// Issue this pair and start accepting its access token.
    Issue(String, String),
    /// Reply with this status.
    Status(u16),
    /// Fail without a response.
    Unreachable,
}

/// A request as the fake API saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub url: String,
    pub authorization: Option<String>,
}

/// Accepts exactly one access token; everything else gets 401.
pub struct FakeApi {
    valid_access: Mutex<String>,
    refresh: Mutex<RefreshBehavior>,
    refresh_delay: Duration,
    refresh_calls: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
    /// Fixed reply for non-refresh calls, bypassing the token check.
    fixed: Mutex<Option<Result<HttpResponse, TransportError>>>,
}

impl FakeApi {
    pub fn new(valid_access: &str, refresh: RefreshBehavior) -> Arc<Self> {
        Arc::new(Self {
            valid_access: Mutex::new(valid_access.to_string()),
            refresh: Mutex::new(refresh),
            refresh_delay: Duration::from_millis(100),
            refresh_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            fixed: Mutex::new(None),
        })
    }

    pub async fn always(&self, reply: Result<HttpResponse, TransportError>) {
        *self.fixed.lock().await = Some(reply);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub async fn seen(&self) -> Vec<Seen> {
        self.seen.lock().await.clone()
    }

    /// Authorization headers of every non-refresh call.
    pub async fn api_authorizations(&self) -> Vec<Option<String>> {
        self.seen
            .lock()
            .await
            .iter()
            .filter(|s| s.url != REFRESH_URL)
            .map(|s| s.authorization.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let authorization = request.headers.get("authorization").map(str::to_string);
        self.seen.lock().await.push(Seen {
            url: request.url.clone(),
            authorization: authorization.clone(),
        });

        if request.url == REFRESH_URL {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.refresh_delay).await;
            let behavior = self.refresh.lock().await.clone();
            return match behavior {
                RefreshBehavior::Issue(access, refresh) => {
                    *self.valid_access.lock().await = access.clone();
                    Ok(HttpResponse::new(
                        200,
                        serde_json::json!({"access": access, "refresh": refresh}).to_string(),
                    ))
                }
                RefreshBehavior::Status(status) => Ok(HttpResponse::new(status, "{}")),
                RefreshBehavior::Unreachable => Err(TransportError::Connection {
                    message: "connection refused".into(),
                }),
            };
        }

        if let Some(reply) = self.fixed.lock().await.clone() {
            return reply;
        }

        let expected = format!("Bearer {}", self.valid_access.lock().await);
        if authorization.as_deref() == Some(expected.as_str()) {
            Ok(HttpResponse::new(200, r#"{"ok":true}"#))
        } else {
            Ok(HttpResponse::new(401, r#"{"error":"Unauthorized"}"#))
        }
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new(ApiUrl::new(BASE_URL).unwrap())
}

/// A client whose store holds `a1`/`r1`.
pub fn client_with_session(
    api: Arc<FakeApi>,
    stay_signed_in: bool,
) -> (AuthClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_session(
        &CredentialPair::new("a1", "r1"),
        stay_signed_in,
    ));
    let client = AuthClient::new(config(), api, store.clone());
    (client, store)
}
