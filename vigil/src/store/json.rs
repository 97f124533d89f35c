//! JSON-file implementation of the tracking store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{AccountKey, TrackedAccount, TrackingStore};
use crate::error::Result;

/// Persists tracked accounts as a pretty-printed JSON array.
///
/// The internal mutex serializes load-modify-save sequences so concurrent
/// `put`/`delete` calls cannot lose writes. A missing file reads as an empty
/// list; a corrupt file surfaces a serialization error.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<TrackedAccount>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file and rename over the target, so an
    /// interrupted write never leaves a truncated accounts file behind.
    async fn save(&self, accounts: &[TrackedAccount]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(accounts)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = accounts.len(), "saved tracked accounts");
        Ok(())
    }
}

#[async_trait]
impl TrackingStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<TrackedAccount>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, key: &AccountKey) -> Result<Option<TrackedAccount>> {
        let _guard = self.lock.lock().await;
        let accounts = self.load().await?;
        Ok(accounts.into_iter().find(|a| a.key() == *key))
    }

    async fn put(&self, account: TrackedAccount) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut accounts = self.load().await?;
        match accounts.iter_mut().find(|a| a.key() == account.key()) {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
        self.save(&accounts).await
    }

    async fn delete(&self, key: &AccountKey) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut accounts = self.load().await?;
        let before = accounts.len();
        accounts.retain(|a| a.key() != *key);
        if accounts.len() == before {
            return Ok(false);
        }
        self.save(&accounts).await?;
        Ok(true)
    }
}
