pub mod file;
pub mod memory;
pub mod rest;
pub mod traits;
pub mod types;

pub use file::JsonFileSource;
pub use memory::MemorySource;
pub use rest::RestDealSource;
pub use traits::DealSource;
pub use types::RestSourceParams;

use crate::models::Deal;
use tracing::warn;

/// Deserialize backend rows one by one, skipping rows that do not describe
/// a usable deal instead of failing the whole batch.
pub(crate) fn parse_rows(rows: Vec<serde_json::Value>) -> Vec<Deal> {
    let total = rows.len();
    let deals: Vec<Deal> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<Deal>(row) {
            Ok(deal) => Some(deal),
            Err(err) => {
                warn!("Skipped listing row {}: {}", idx, err);
                None
            }
        })
        .collect();

    if deals.len() < total {
        warn!("Skipped {} of {} listing rows", total - deals.len(), total);
    }
    deals
}
