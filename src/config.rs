//! # Configuration
//!
//! Settings live in a JSON file. Resolution order:
//! 1. Path given on the command line (`--config`).
//! 2. Path in the `DEAL_SCOUT_CONFIG` environment variable.
//! 3. Built-in defaults.
//!
//! `DEAL_SCOUT_API_KEY`, when set, overrides the REST source API key so the
//! key does not have to be written to disk.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `source` | `{"kind": "file", "path": "deals.json"}` | Where candidate deals come from |
//! | `saved_store_path` | `saved_deals.json` | Saved deals per viewer |
//! | `page_size` | `12` | Marketplace page size when the URL has no `limit` |
//! | `search_debounce_ms` | `300` | Quiet period before a search edit navigates |
//! | `base_path` | `/marketplace` | Path shareable links are built on |
//! | `public_statuses` | `["active", "under_contract"]` | Statuses anyone may see |
//! | `elevated_roles` | `["admin"]` | Roles that see every deal |

use crate::discovery::controller::marketplace::DEFAULT_BASE_PATH;
use crate::discovery::controller::DEFAULT_SEARCH_DEBOUNCE;
use crate::discovery::paginate::DEFAULT_LIMIT;
use crate::discovery::visibility::{RoleVisibility, ViewerRole};
use crate::models::DealStatus;
use crate::sources::RestSourceParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_ENV: &str = "DEAL_SCOUT_CONFIG";
pub const API_KEY_ENV: &str = "DEAL_SCOUT_API_KEY";

/// Where candidate deals are fetched from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Rest(RestSourceParams),
    File { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::File {
            path: PathBuf::from("deals.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoutConfig {
    pub source: SourceConfig,
    pub saved_store_path: PathBuf,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub base_path: String,
    pub public_statuses: Vec<DealStatus>,
    pub elevated_roles: Vec<ViewerRole>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        let visibility = RoleVisibility::default();
        Self {
            source: SourceConfig::default(),
            saved_store_path: PathBuf::from("saved_deals.json"),
            page_size: DEFAULT_LIMIT,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            base_path: DEFAULT_BASE_PATH.to_string(),
            public_statuses: visibility.public_statuses,
            elevated_roles: visibility.elevated_roles,
        }
    }
}

impl ScoutConfig {
    /// Resolve configuration from an explicit path, the environment, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key(key);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Set the REST API key. No effect for file sources.
    pub fn apply_api_key(&mut self, key: String) {
        if let SourceConfig::Rest(params) = &mut self.source {
            params.api_key = Some(key).filter(|k| !k.is_empty());
        }
    }

    pub fn visibility(&self) -> RoleVisibility {
        RoleVisibility {
            public_statuses: self.public_statuses.clone(),
            elevated_roles: self.elevated_roles.clone(),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
