use crate::discovery::visibility::VisibilityContext;
use crate::models::Deal;
use crate::sources::parse_rows;
use crate::sources::traits::DealSource;
use crate::sources::types::RestSourceParams;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listings source backed by the hosted Postgres REST endpoint
pub struct RestDealSource {
    client: Client,
    params: RestSourceParams,
}

impl RestDealSource {
    /// Create a new REST source with the given connection parameters
    pub fn new(params: RestSourceParams) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = params.api_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                "apikey",
                HeaderValue::from_str(key).context("API key is not a valid header value")?,
            );
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))
                    .context("API key is not a valid header value")?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .user_agent(concat!("deal-scout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, params })
    }

    /// Listings endpoint, newest first
    pub fn listings_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select={}&order=created_at.desc",
            self.params.base_url.trim_end_matches('/'),
            self.params.table,
            self.params.select
        )
    }
}

#[async_trait]
impl DealSource for RestDealSource {
    async fn fetch_candidates(&self, context: &VisibilityContext) -> Result<Vec<Deal>> {
        let url = self.listings_url();
        info!("Fetching candidate deals from {}", self.params.base_url);
        debug!(url = %url, role = ?context.role, "Fetching URL");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch listings")?;

        if !response.status().is_success() {
            warn!("Listings backend returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listings: {}", response.status());
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .context("Failed to decode listings response")?;

        debug!("Downloaded {} listing rows", rows.len());

        let deals = parse_rows(rows);
        info!("Fetched {} candidate deals", deals.len());
        Ok(deals)
    }

    fn source_name(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_url_orders_by_recency() {
        let source = RestDealSource::new(RestSourceParams {
            base_url: "https://example.supabase.co/".to_string(),
            api_key: Some("anon-key".to_string()),
            ..RestSourceParams::default()
        })
        .unwrap();

        assert_eq!(
            source.listings_url(),
            "https://example.supabase.co/rest/v1/deals?select=*,owner:profiles(id,full_name,email)&order=created_at.desc"
        );
        assert_eq!(source.source_name(), "rest");
    }

    #[test]
    fn rejects_api_key_with_newline() {
        let result = RestDealSource::new(RestSourceParams {
            api_key: Some("bad\nkey".to_string()),
            ..RestSourceParams::default()
        });
        assert!(result.is_err());
    }
}
