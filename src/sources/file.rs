use crate::discovery::visibility::VisibilityContext;
use crate::models::Deal;
use crate::sources::parse_rows;
use crate::sources::traits::DealSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Listings exported to a JSON array on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DealSource for JsonFileSource {
    async fn fetch_candidates(&self, _context: &VisibilityContext) -> Result<Vec<Deal>> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read listings from {}", self.path.display()))?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&data)
            .with_context(|| format!("{} is not a JSON array of listings", self.path.display()))?;

        let deals = parse_rows(rows);
        info!("📂 Loaded {} deals from {}", deals.len(), self.path.display());
        Ok(deals)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
