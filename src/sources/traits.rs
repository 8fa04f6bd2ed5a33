use crate::discovery::visibility::VisibilityContext;
use crate::models::Deal;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can supply candidate deals.
/// The engine only needs a consistent snapshot per call; how it is
/// produced (one bulk query, a cache, a file) is up to the implementation.
#[async_trait]
pub trait DealSource: Send + Sync {
    /// Fetch the candidate collection for a viewer
    async fn fetch_candidates(&self, context: &VisibilityContext) -> Result<Vec<Deal>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
