//! authwire-file - File-backed credential store.
//!
//! [`FileCredentialStore`] keeps the session credentials in a single JSON
//! file so they survive process restarts.

mod store;

pub use store::FileCredentialStore;
