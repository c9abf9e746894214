//! Collaborator traits consumed by the request layer.

mod store;
mod transport;

pub use store::{CredentialKey, CredentialStore};
pub use transport::Transport;
