//! Typed access to the credential store.

use std::sync::Arc;

use tracing::debug;

use authwire_core::error::StoreError;
use authwire_core::{AccessToken, CredentialKey, CredentialPair, CredentialStore, RefreshToken};

/// Value of `keep_logged_in` that enables refresh.
const KEEP_LOGGED_IN: &str = "true";

/// Which parts of a session are currently persisted.
///
/// Never carries token values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    pub stay_signed_in: bool,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        !self.has_access_token && !self.has_refresh_token && !self.stay_signed_in
    }
}

/// Typed wrapper over an external [`CredentialStore`].
///
/// Empty stored strings read as absent.
#[derive(Clone)]
pub struct CredentialVault {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVault {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    async fn read(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(key).await?.filter(|v| !v.is_empty()))
    }

    pub async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self
            .read(CredentialKey::AccessToken)
            .await?
            .map(AccessToken::new))
    }

    pub async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self
            .read(CredentialKey::RefreshToken)
            .await?
            .map(RefreshToken::new))
    }

    /// True only when `keep_logged_in` holds exactly `"true"`.
    pub async fn stay_signed_in(&self) -> Result<bool, StoreError> {
        Ok(self.read(CredentialKey::KeepLoggedIn).await?.as_deref() == Some(KEEP_LOGGED_IN))
    }

    /// Replace the stored pair, access first.
    ///
    /// Atomic only if the underlying store overrides `set_many`.
    pub async fn replace_pair(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        self.store
            .set_many(&[
                (CredentialKey::AccessToken, pair.access.as_str()),
                (CredentialKey::RefreshToken, pair.refresh.as_str()),
            ])
            .await?;
        debug!("Stored credential pair");
        Ok(())
    }

    /// Persist the outcome of a login.
    pub async fn start_session(
        &self,
        pair: &CredentialPair,
        stay_signed_in: bool,
    ) -> Result<(), StoreError> {
        if stay_signed_in {
            self.store
                .set_many(&[
                    (CredentialKey::AccessToken, pair.access.as_str()),
                    (CredentialKey::RefreshToken, pair.refresh.as_str()),
                    (CredentialKey::KeepLoggedIn, KEEP_LOGGED_IN),
                ])
                .await?;
        } else {
            self.replace_pair(pair).await?;
            self.store.delete(CredentialKey::KeepLoggedIn).await?;
        }
        debug!(stay_signed_in, "Stored new session");
        Ok(())
    }

    /// Delete every credential key.
    ///
    /// Returns whether anything was stored beforehand.
    pub async fn clear(&self) -> Result<bool, StoreError> {
        let had_session = !self.snapshot().await?.is_empty();
        self.store.delete_many(&CredentialKey::ALL).await?;
        debug!(had_session, "Cleared credentials");
        Ok(had_session)
    }

    pub async fn snapshot(&self) -> Result<StoredSession, StoreError> {
        Ok(StoredSession {
            has_access_token: self.read(CredentialKey::AccessToken).await?.is_some(),
            has_refresh_token: self.read(CredentialKey::RefreshToken).await?.is_some(),
            stay_signed_in: self.stay_signed_in().await?,
        })
    }
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}
