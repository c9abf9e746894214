//! authwire-core - Core types and traits for the authenticated request layer.

pub mod error;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::Error;
pub use tokens::{AccessToken, CredentialPair, RefreshToken};
pub use traits::{CredentialKey, CredentialStore, Transport};
pub use types::{ApiUrl, Body, Headers, HttpRequest, HttpResponse, Method, Part};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
