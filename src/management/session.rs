use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{Error, Result, management::CredentialProvider, types::SongQuery};

pub const KEY_LAST_TOTAL: &str = "last_total";
pub const KEY_LAST_FOUND: &str = "last_found";
pub const KEY_LAST_NOT_FOUND_COUNT: &str = "last_not_found_count";
pub const KEY_LAST_NOT_FOUND: &str = "last_not_found";
pub const KEY_LAST_PLAYLIST_URL: &str = "last_playlist_url";

/// Key-value blobs shared between the import and whoever displays its result.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: StdMutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.entries().insert(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries().remove(key)
    }

    pub fn get_count(&self, key: &str) -> usize {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    /// The not-found list of the last import; malformed or missing data reads as empty.
    pub fn last_not_found(&self) -> Vec<SongQuery> {
        self.get(KEY_LAST_NOT_FOUND)
            .and_then(|v| serde_json::from_str(&v).ok())
            .unwrap_or_default()
    }
}

/// Held for the whole duration of an import or export.
#[derive(Debug)]
pub struct OperationGuard {
    _lock: OwnedMutexGuard<()>,
}

/// Everything an operation needs from its surroundings: the credential, the
/// result store, and the lock that keeps operations from overlapping.
pub struct Session {
    credentials: Arc<dyn CredentialProvider>,
    store: SessionStore,
    running: Arc<Mutex<()>>,
}

impl Session {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            store: SessionStore::new(),
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    /// Claims the session for one operation.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while another operation still holds its guard.
    pub fn begin(&self) -> Result<OperationGuard> {
        let lock = Arc::clone(&self.running)
            .try_lock_owned()
            .map_err(|_| Error::Busy)?;
        Ok(OperationGuard { _lock: lock })
    }

    /// Returns the bearer token or [`Error::AuthRequired`].
    pub async fn bearer_token(&self) -> Result<String> {
        self.credentials
            .bearer_token()
            .await
            .ok_or(Error::AuthRequired)
    }
}
