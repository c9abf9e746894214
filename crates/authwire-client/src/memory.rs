//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use authwire_core::error::StoreError;
use authwire_core::{CredentialKey, CredentialPair, CredentialStore};

/// A process-local credential store.
///
/// Values do not survive a restart. Useful for tests and for short-lived
/// tools that receive their tokens from elsewhere. Multi-key writes are
/// atomic with respect to other calls on the same store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a session.
    pub fn with_session(pair: &CredentialPair, stay_signed_in: bool) -> Self {
        let mut values = HashMap::new();
        values.insert(CredentialKey::AccessToken, pair.access.as_str().to_string());
        values.insert(CredentialKey::RefreshToken, pair.refresh.as_str().to_string());
        if stay_signed_in {
            values.insert(CredentialKey::KeepLoggedIn, "true".to_string());
        }
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        self.values.lock().await.insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: CredentialKey) -> Result<(), StoreError> {
        self.values.lock().await.remove(&key);
        Ok(())
    }

    async fn set_many(&self, entries: &[(CredentialKey, &str)]) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        for (key, value) in entries {
            values.insert(*key, value.to_string());
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[CredentialKey]) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        for key in keys {
            values.remove(key);
        }
        Ok(())
    }
}
