//! The two surfaces built on the discovery engine: the public marketplace
//! (URL-driven, paginated) and the admin table (local search, sortable).

pub mod admin;
pub mod debounce;
pub mod marketplace;
pub mod refresh;

pub use admin::{AdminColumn, AdminTable};
pub use debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use marketplace::{MarketplaceController, MarketplaceView};
pub use refresh::{RefreshTicket, RefreshTracker};

use crate::models::Deal;

/// Where the controller is in its navigation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    FilterChanged,
    UrlUpdated,
    Refetching,
}

/// What a rendered view is showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// No fetch has completed yet
    Loading,
    Results,
    /// The listings loaded but nothing matched
    NoMatches,
    /// The listings could not be loaded at all
    LoadFailed { message: String },
}

impl ViewOutcome {
    /// Empty-state text shown in place of results
    pub fn empty_state_message(&self) -> Option<String> {
        match self {
            ViewOutcome::Loading => Some("Loading listings…".to_string()),
            ViewOutcome::Results => None,
            ViewOutcome::NoMatches => Some("No deals match your filters.".to_string()),
            ViewOutcome::LoadFailed { message } => Some(format!(
                "Something went wrong loading listings: {}",
                message
            )),
        }
    }
}

/// Candidate collection as last fetched
#[derive(Debug, Clone)]
pub(crate) enum Candidates {
    NotLoaded,
    Loaded(Vec<Deal>),
    Failed(String),
}
