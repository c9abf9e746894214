//! authwire-client - Authenticated request layer.
//!
//! Every call made through an [`AuthClient`] carries the stored access
//! token. When the server answers 401, the client obtains a fresh token
//! through a single shared refresh call and retries the original request
//! once. Concurrent callers that hit 401 at the same time wait on that one
//! refresh instead of issuing their own.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use authwire_client::{AuthClient, ClientConfig, MemoryCredentialStore, RequestOptions};
//! use authwire_core::{ApiUrl, Transport};
//!
//! # async fn example(transport: Arc<dyn Transport>) -> Result<(), authwire_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.example.com")?);
//! let store = Arc::new(MemoryCredentialStore::new());
//! let client = AuthClient::new(config, transport, store);
//!
//! let mut events = client.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("session event: {event:?}");
//!     }
//! });
//!
//! let me = client.get("/me", RequestOptions::new()).await?;
//! println!("{}", me.text());
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod classify;
mod client;
mod config;
mod coordinator;
mod events;
mod executor;
mod memory;
mod refresh;
mod vault;

pub use classify::{Classification, classify};
pub use client::{AuthClient, RequestOptions, SessionStatus};
pub use config::{ClientConfig, DEFAULT_REFRESH_PATH, DEFAULT_REFRESH_TIMEOUT};
pub use coordinator::RefreshCoordinator;
pub use events::{SessionEvent, SessionEvents};
pub use memory::MemoryCredentialStore;
pub use vault::{CredentialVault, StoredSession};
