//! JSON file credential storage.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use authwire_core::error::StoreError;
use authwire_core::{CredentialKey, CredentialStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(err: std::io::Error) -> StoreError {
    StoreError::Io {
        message: err.to_string(),
    }
}

/// On-disk layout of the credentials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    credentials: BTreeMap<String, String>,
}

/// Credential store persisted to a JSON file.
///
/// Every mutation rewrites the whole file under an exclusive lock via a
/// temp file and rename, so readers never observe a partial write and a
/// multi-key write lands all at once. On Unix the file is created with mode
/// `0600`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn read(&self) -> Result<CredentialsFile, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CredentialsFile::default()),
            Err(e) => return Err(map_io(e)),
        };

        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            message: format!("{}: {}", self.path.display(), e),
        })
    }

    fn write(&self, mut file: CredentialsFile) -> Result<(), StoreError> {
        file.updated_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(&file).map_err(|e| StoreError::Corrupt {
            message: e.to_string(),
        })?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let mut temp = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .map_err(map_io)?;
        restrict_permissions(&temp)?;
        temp.write_all(content.as_bytes()).map_err(map_io)?;
        temp.sync_data().map_err(map_io)?;
        drop(temp);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(map_io(e));
        }
        Ok(())
    }

    /// Apply `change` to the stored credentials under the file lock.
    fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;

        let result = self.read().and_then(|mut file| {
            if change(&mut file.credentials) {
                self.write(file)
            } else {
                Ok(())
            }
        });

        // The lock is also released when the file is closed.
        if let Err(e) = lock_file.unlock() {
            warn!(error = %e, "Failed to release credentials lock");
        }

        result
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<(), StoreError> {
    let mut perms = file.metadata().map_err(map_io)?.permissions();
    perms.set_mode(0o600);
    file.set_permissions(perms).map_err(map_io)
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<(), StoreError> {
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.credentials.remove(key.as_str()))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        self.set_many(&[(key, value)]).await
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn delete(&self, key: CredentialKey) -> Result<(), StoreError> {
        self.delete_many(&[key]).await
    }

    async fn set_many(&self, entries: &[(CredentialKey, &str)]) -> Result<(), StoreError> {
        self.update(|credentials| {
            for (key, value) in entries {
                credentials.insert(key.as_str().to_string(), value.to_string());
            }
            true
        })?;
        debug!(keys = entries.len(), "Stored credentials");
        Ok(())
    }

    async fn delete_many(&self, keys: &[CredentialKey]) -> Result<(), StoreError> {
        self.update(|credentials| {
            let before = credentials.len();
            for key in keys {
                credentials.remove(key.as_str());
            }
            credentials.len() != before
        })?;
        debug!(keys = keys.len(), "Deleted credentials");
        Ok(())
    }
}
