//! Credential store trait.

use std::fmt;

use async_trait::async_trait;

use crate::error::StoreError;

/// The fixed set of persisted credential keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    AccessToken,
    RefreshToken,
    KeepLoggedIn,
}

impl CredentialKey {
    /// Every key, in write order.
    pub const ALL: [CredentialKey; 3] = [
        CredentialKey::AccessToken,
        CredentialKey::RefreshToken,
        CredentialKey::KeepLoggedIn,
    ];

    /// The persisted name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "access_token",
            CredentialKey::RefreshToken => "refresh_token",
            CredentialKey::KeepLoggedIn => "keep_logged_in",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable string storage for session credentials.
///
/// Values must survive process restarts. Single-key operations are the
/// contract; `set_many` and `delete_many` default to one call per key and
/// are not atomic unless an implementation overrides them.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: CredentialKey) -> Result<(), StoreError>;

    /// Write several keys, in order.
    async fn set_many(&self, entries: &[(CredentialKey, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(*key, value).await?;
        }
        Ok(())
    }

    /// Delete several keys, in order.
    async fn delete_many(&self, keys: &[CredentialKey]) -> Result<(), StoreError> {
        for key in keys {
            self.delete(*key).await?;
        }
        Ok(())
    }
}
