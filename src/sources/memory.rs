use crate::discovery::visibility::VisibilityContext;
use crate::models::Deal;
use crate::sources::traits::DealSource;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory candidate source, used by tests and demos
#[derive(Clone, Default)]
pub struct MemorySource {
    deals: Arc<Mutex<Vec<Deal>>>,
    fail: Arc<AtomicBool>,
    latency: Arc<Mutex<Option<Duration>>>,
    fetches: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(deals: Vec<Deal>) -> Self {
        Self {
            deals: Arc::new(Mutex::new(deals)),
            ..Self::default()
        }
    }

    /// Replace the backing collection; later fetches see the new snapshot
    pub fn replace(&self, deals: Vec<Deal>) {
        if let Ok(mut current) = self.deals.lock() {
            *current = deals;
        }
    }

    /// Make subsequent fetches fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Delay every fetch by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut current) = self.latency.lock() {
            *current = latency;
        }
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DealSource for MemorySource {
    async fn fetch_candidates(&self, _context: &VisibilityContext) -> Result<Vec<Deal>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency.lock().ok().and_then(|l| *l);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("listings backend unavailable");
        }

        let snapshot = self
            .deals
            .lock()
            .map_err(|_| anyhow::anyhow!("listing snapshot lock poisoned"))?
            .clone();
        Ok(snapshot)
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
