//! authwire-http - reqwest transport for authwire.
//!
//! Provides [`ReqwestTransport`], the production [`Transport`] used by
//! [`authwire_client::AuthClient`](https://docs.rs/authwire-client).
//!
//! [`Transport`]: authwire_core::Transport

mod transport;

pub use transport::{DEFAULT_TIMEOUT, ReqwestTransport, USER_AGENT};
