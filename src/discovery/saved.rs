//! Saved ("hearted") deals.
//!
//! A [`SavedSet`] is a plain set of deal ids owned by the viewer. It knows
//! nothing about any particular deal collection, so saving a deal while a
//! filter is active is still reflected once the filter is cleared.
//! Persistence goes through a [`SavedStore`].

use crate::models::Deal;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SavedStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Saved store unavailable: {0}")]
    Unavailable(String),
}

pub type SavedResult<T> = std::result::Result<T, SavedStoreError>;

/// Ids of the deals a viewer has saved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet {
    ids: HashSet<String>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add `id` if missing, remove it otherwise. Returns whether it is now saved.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn set(&mut self, id: &str, saved: bool) {
        if saved {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in a stable order
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<String> for SavedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Restrict `deals` to saved ones when `show_saved_only` is set
pub fn restrict_to_saved<T: Borrow<Deal>>(
    mut deals: Vec<T>,
    saved: &SavedSet,
    show_saved_only: bool,
) -> Vec<T> {
    if show_saved_only {
        deals.retain(|deal| saved.contains(&deal.borrow().id));
    }
    deals
}

/// Result of a persisted toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub saved: bool,
}

/// Key-value persistence for saved sets, keyed by viewer id
#[async_trait]
pub trait SavedStore: Send + Sync {
    /// Current saved set for `viewer`
    async fn list(&self, viewer: &str) -> SavedResult<SavedSet>;

    /// Flip membership of `deal_id` for `viewer`
    async fn toggle(&self, viewer: &str, deal_id: &str) -> SavedResult<ToggleOutcome>;
}

/// In-process store, mostly for tests and anonymous sessions
#[derive(Default)]
pub struct MemorySavedStore {
    sets: Mutex<HashMap<String, SavedSet>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemorySavedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent toggle fail, to exercise error handling
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent list fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> SavedResult<std::sync::MutexGuard<'_, HashMap<String, SavedSet>>> {
        self.sets
            .lock()
            .map_err(|_| SavedStoreError::Unavailable("saved set lock poisoned".to_string()))
    }
}

#[async_trait]
impl SavedStore for MemorySavedStore {
    async fn list(&self, viewer: &str) -> SavedResult<SavedSet> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SavedStoreError::Unavailable("simulated read failure".to_string()));
        }
        Ok(self.lock()?.get(viewer).cloned().unwrap_or_default())
    }

    async fn toggle(&self, viewer: &str, deal_id: &str) -> SavedResult<ToggleOutcome> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SavedStoreError::Unavailable("simulated write failure".to_string()));
        }
        let mut sets = self.lock()?;
        let saved = sets.entry(viewer.to_string()).or_default().toggle(deal_id);
        Ok(ToggleOutcome { saved })
    }
}

/// On-disk layout: viewer id → sorted deal ids
type SavedDocument = BTreeMap<String, BTreeSet<String>>;

/// Saved sets persisted as a single JSON document
pub struct JsonFileSavedStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileSavedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SavedResult<SavedDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) if data.trim().is_empty() => Ok(SavedDocument::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SavedDocument::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write via a temp file and rename so readers never see a partial file
    async fn store(&self, document: &SavedDocument) -> SavedResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SavedStore for JsonFileSavedStore {
    async fn list(&self, viewer: &str) -> SavedResult<SavedSet> {
        let document = self.load().await?;
        Ok(document
            .get(viewer)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn toggle(&self, viewer: &str, deal_id: &str) -> SavedResult<ToggleOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let ids = document.entry(viewer.to_string()).or_default();
        let saved = if ids.remove(deal_id) {
            false
        } else {
            ids.insert(deal_id.to_string());
            true
        };
        if ids.is_empty() {
            document.remove(viewer);
        }
        self.store(&document).await?;
        debug!(viewer, deal_id, saved, path = %self.path.display(), "Persisted saved deal toggle");
        Ok(ToggleOutcome { saved })
    }
}
