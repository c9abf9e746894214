//! Shared command setup: credential file location and client construction.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;

use authwire_client::{AuthClient, ClientConfig, CredentialVault};
use authwire_core::{ApiUrl, CredentialStore};
use authwire_file::FileCredentialStore;
use authwire_http::ReqwestTransport;

use crate::cli::GlobalArgs;

#[derive(Debug)]
pub struct Context {
    args: GlobalArgs,
}

impl Context {
    pub fn new(args: GlobalArgs) -> Self {
        Self { args }
    }

    /// The credentials file in use.
    pub fn credentials_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.args.credentials {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("", "", "authwire")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().join("credentials.json"))
    }

    pub fn store(&self) -> Result<Arc<dyn CredentialStore>> {
        Ok(Arc::new(FileCredentialStore::new(self.credentials_path()?)))
    }

    pub fn vault(&self) -> Result<CredentialVault> {
        Ok(CredentialVault::new(self.store()?))
    }

    /// Build a client for the configured API.
    pub fn client(&self) -> Result<AuthClient> {
        let base_url = self
            .args
            .base_url
            .as_deref()
            .context("No API base URL. Pass --base-url or set AUTHWIRE_BASE_URL.")?;
        let base_url = ApiUrl::new(base_url).context("Invalid base URL")?;

        let timeout = Duration::from_secs(self.args.timeout);
        let config = ClientConfig::new(base_url)
            .with_refresh_path(self.args.refresh_path.clone())
            .with_refresh_timeout(timeout);
        let transport =
            ReqwestTransport::with_timeout(timeout).context("Failed to build HTTP client")?;

        Ok(AuthClient::new(config, Arc::new(transport), self.store()?))
    }
}
