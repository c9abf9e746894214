//! Public client API.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::instrument;

use authwire_core::{
    Body, CredentialPair, CredentialStore, Headers, HttpRequest, HttpResponse, Method, Result,
    Transport,
};

use crate::authenticator::Authenticator;
use crate::config::ClientConfig;
use crate::coordinator::RefreshCoordinator;
use crate::events::{SessionEvent, SessionEvents};
use crate::executor::Executor;
use crate::vault::CredentialVault;

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Headers,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        Ok(self.body(Body::json(value)?))
    }
}

/// Session state as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    pub stay_signed_in: bool,
    pub refreshing: bool,
    pub refresh_count: u64,
}

struct ClientInner {
    config: ClientConfig,
    vault: CredentialVault,
    events: SessionEvents,
    coordinator: RefreshCoordinator,
    executor: Executor,
}

/// Authenticated HTTP client.
///
/// Construct once per process and share it; clones share the refresh state,
/// which is what makes refresh single-flight across the whole application.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

impl AuthClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self::with_events(config, transport, store, SessionEvents::default())
    }

    /// Use an existing event sink, e.g. one shared with other components.
    pub fn with_events(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        events: SessionEvents,
    ) -> Self {
        let vault = CredentialVault::new(store);
        let coordinator = RefreshCoordinator::new(
            config.clone(),
            transport.clone(),
            vault.clone(),
            events.clone(),
        );
        let executor = Executor::new(
            transport,
            Authenticator::new(vault.clone()),
            coordinator.clone(),
        );

        Self {
            inner: Arc::new(ClientInner {
                config,
                vault,
                events,
                coordinator,
                executor,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Perform an authenticated call.
    ///
    /// `path` is resolved against the configured base URL; absolute URLs are
    /// used as given.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.inner.config.base_url.resolve(path),
            headers: options.headers,
            query: options.query,
            body: options.body,
        };
        self.inner.executor.execute(request).await
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<HttpResponse> {
        self.request(Method::Get, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<HttpResponse> {
        self.request(Method::Post, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<HttpResponse> {
        self.request(Method::Put, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<HttpResponse> {
        self.request(Method::Patch, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<HttpResponse> {
        self.request(Method::Delete, path, options).await
    }

    /// Store the credentials obtained from a login.
    #[instrument(skip(self, pair))]
    pub async fn start_session(&self, pair: CredentialPair, stay_signed_in: bool) -> Result<()> {
        self.inner
            .coordinator
            .begin_session(&pair, stay_signed_in)
            .await
    }

    /// Clear the stored session. Emits a logout if a session existed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<bool> {
        self.inner.coordinator.end_session().await
    }

    /// Refresh the stored credentials now, sharing any refresh in flight.
    #[instrument(skip(self))]
    pub async fn refresh_now(&self) -> Result<()> {
        self.inner.coordinator.refresh_now().await.map(|_| ())
    }

    pub async fn status(&self) -> Result<SessionStatus> {
        let stored = self.inner.vault.snapshot().await?;
        Ok(SessionStatus {
            has_access_token: stored.has_access_token,
            has_refresh_token: stored.has_refresh_token,
            stay_signed_in: stored.stay_signed_in,
            refreshing: self.inner.coordinator.is_refreshing().await,
            refresh_count: self.inner.coordinator.refresh_count(),
        })
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.inner.config.base_url)
            .field("coordinator", &self.inner.coordinator)
            .finish()
    }
}
