use super::debounce::SearchDebouncer;
use super::refresh::{RefreshTicket, RefreshTracker};
use super::{Candidates, ControllerState, ViewOutcome};
use crate::discovery::codec::{parse_query, DiscoveryQuery, LIMIT};
use crate::discovery::criteria::FilterCriteria;
use crate::discovery::filter::retain_matching;
use crate::discovery::paginate::{paginate, Page, PageRequest};
use crate::discovery::saved::{restrict_to_saved, SavedSet, SavedStore};
use crate::discovery::sort::order_by_recency;
use crate::discovery::visibility::{VisibilityContext, VisibilityRule};
use crate::models::Deal;
use crate::sources::DealSource;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_PATH: &str = "/marketplace";

/// One rendered marketplace page
#[derive(Debug, Clone)]
pub struct MarketplaceView {
    /// Shareable location that reproduces this view
    pub location: String,
    pub criteria: FilterCriteria,
    pub page: Page<Deal>,
    pub outcome: ViewOutcome,
    pub saved: SavedSet,
    pub show_saved_only: bool,
    /// Non-fatal problem to show inline, e.g. a failed save
    pub notice: Option<String>,
}

impl MarketplaceView {
    pub fn is_saved(&self, deal_id: &str) -> bool {
        self.saved.contains(deal_id)
    }
}

/// Drives the public marketplace: URL in, page of deals out.
pub struct MarketplaceController {
    source: Arc<dyn DealSource>,
    saved_store: Arc<dyn SavedStore>,
    visibility: Arc<dyn VisibilityRule>,
    context: VisibilityContext,
    base_path: String,
    default_limit: usize,
    query: DiscoveryQuery,
    show_saved_only: bool,
    state: ControllerState,
    refresh: RefreshTracker,
    debouncer: SearchDebouncer,
    candidates: Candidates,
    saved: SavedSet,
    load_notice: Option<String>,
    save_notice: Option<String>,
}

impl MarketplaceController {
    pub fn new(
        source: Arc<dyn DealSource>,
        saved_store: Arc<dyn SavedStore>,
        visibility: Arc<dyn VisibilityRule>,
        context: VisibilityContext,
    ) -> Self {
        let default_limit = PageRequest::default().limit;
        Self {
            source,
            saved_store,
            visibility,
            context,
            base_path: DEFAULT_BASE_PATH.to_string(),
            default_limit,
            query: DiscoveryQuery::default(),
            show_saved_only: false,
            state: ControllerState::Idle,
            refresh: RefreshTracker::new(),
            debouncer: SearchDebouncer::default(),
            candidates: Candidates::NotLoaded,
            saved: SavedSet::new(),
            load_notice: None,
            save_notice: None,
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Page size used when the URL carries no `limit`
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self.query.page.limit = limit;
        self
    }

    /// Quiet period for [`search_keystroke`](Self::search_keystroke)
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = SearchDebouncer::new(delay);
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.query.criteria
    }

    pub fn page_request(&self) -> PageRequest {
        self.query.page
    }

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    /// Current shareable location. `limit` is omitted only when it matches
    /// this controller's default, so navigating here restores the same page.
    pub fn location(&self) -> String {
        self.query
            .href_with_default_limit(&self.base_path, self.default_limit)
    }

    /// Adopt the state carried by a URL query string
    pub fn navigate(&mut self, raw_query: &str) -> String {
        let params = parse_query(raw_query);
        let mut query = DiscoveryQuery::from_map(&params);
        if !params.contains_key(LIMIT) {
            query.page.limit = self.default_limit;
        }
        self.query = query;
        self.state = ControllerState::UrlUpdated;
        let location = self.location();
        info!("🧭 Navigated to {}", location);
        location
    }

    /// Replace the criteria. Always a full navigation back to page one.
    pub fn update_criteria(&mut self, criteria: FilterCriteria) -> String {
        self.query = DiscoveryQuery::new(criteria, PageRequest::new(1, self.query.page.limit));
        self.state = ControllerState::UrlUpdated;
        let location = self.location();
        debug!(location = %location, "Filters changed");
        location
    }

    /// Edit the current criteria in place
    pub fn edit_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) -> String {
        let mut criteria = self.query.criteria.clone();
        edit(&mut criteria);
        self.update_criteria(criteria)
    }

    /// Apply a settled search box value. Blank text clears the keyword.
    pub fn set_search(&mut self, text: &str) -> String {
        let search = Some(text.trim()).filter(|t| !t.is_empty()).map(str::to_string);
        self.edit_criteria(|criteria| criteria.search = search)
    }

    /// A raw search box keystroke. The filter counts as changed right away,
    /// but the URL is left alone: the returned future yields the text only if
    /// no newer keystroke arrives within the debounce window, and the caller
    /// then applies it with [`set_search`](Self::set_search).
    pub fn search_keystroke(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Option<String>> + Send + 'static {
        self.state = ControllerState::FilterChanged;
        let debouncer = self.debouncer.clone();
        let text = text.to_string();
        async move { debouncer.settle(text).await }
    }

    pub fn clear_filters(&mut self) -> String {
        self.update_criteria(FilterCriteria::default())
    }

    pub fn go_to_page(&mut self, page: usize) -> String {
        self.query.page.page = page.max(1);
        self.state = ControllerState::UrlUpdated;
        self.location()
    }

    /// Local toggle; does not touch the URL or trigger a refetch
    pub fn set_show_saved_only(&mut self, show: bool) {
        self.show_saved_only = show;
    }

    /// Start a refetch. Any fetch started earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.state = ControllerState::Refetching;
        self.refresh.begin()
    }

    /// The fetch itself, detached from the controller so several can be in
    /// flight at once
    pub fn fetch_task(&self) -> impl Future<Output = Result<Vec<Deal>>> + Send + 'static {
        let source = Arc::clone(&self.source);
        let context = self.context.clone();
        async move { source.fetch_candidates(&context).await }
    }

    /// Apply a finished fetch. Returns `false` if it was superseded.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<Deal>>) -> bool {
        if !self.refresh.is_latest(ticket) {
            debug!(sequence = ticket.sequence(), "Discarding stale listing fetch");
            return false;
        }

        self.candidates = match result {
            Ok(deals) => {
                debug!(count = deals.len(), source = self.source.source_name(), "Candidates loaded");
                Candidates::Loaded(deals)
            }
            Err(err) => {
                let detail = format!("{:#}", err);
                error!(error = %detail, "Failed to load listings");
                Candidates::Failed(err.to_string())
            }
        };
        self.state = ControllerState::Idle;
        true
    }

    /// Refetch candidates and the viewer's saved set, then render
    pub async fn refresh(&mut self) -> MarketplaceView {
        let ticket = self.begin_refresh();
        let result = self.fetch_task().await;
        self.complete_refresh(ticket, result);
        self.load_saved().await;
        self.view()
    }

    /// Pull the saved set for the current viewer. Anonymous viewers keep a
    /// purely local set.
    pub async fn load_saved(&mut self) {
        let Some(viewer) = self.context.viewer_id.clone() else {
            return;
        };
        match self.saved_store.list(&viewer).await {
            Ok(saved) => {
                self.saved = saved;
                self.load_notice = None;
            }
            Err(err) => {
                warn!(error = %err, "Failed to load saved deals");
                self.load_notice = Some(format!("Couldn't load your saved deals: {}", err));
            }
        }
    }

    /// Save or unsave a deal. The local set flips immediately and flips back
    /// if the store rejects the change. Returns whether the deal ends up saved.
    pub async fn toggle_save(&mut self, deal_id: &str) -> bool {
        let optimistic = self.saved.toggle(deal_id);

        let Some(viewer) = self.context.viewer_id.clone() else {
            return optimistic;
        };

        match self.saved_store.toggle(&viewer, deal_id).await {
            Ok(outcome) => {
                self.saved.set(deal_id, outcome.saved);
                self.save_notice = None;
                outcome.saved
            }
            Err(err) => {
                warn!(error = %err, deal_id, "Saving deal failed, reverting");
                self.saved.set(deal_id, !optimistic);
                self.save_notice = Some(format!("Couldn't update saved deals: {}", err));
                !optimistic
            }
        }
    }

    /// Render the current state without fetching
    pub fn view(&self) -> MarketplaceView {
        let (page, outcome) = match &self.candidates {
            Candidates::NotLoaded => (Page::empty(self.query.page), ViewOutcome::Loading),
            Candidates::Failed(message) => (
                Page::empty(self.query.page),
                ViewOutcome::LoadFailed {
                    message: message.clone(),
                },
            ),
            Candidates::Loaded(deals) => {
                let page = self.select(deals);
                let outcome = if page.total_items == 0 {
                    ViewOutcome::NoMatches
                } else {
                    ViewOutcome::Results
                };
                (page, outcome)
            }
        };

        MarketplaceView {
            location: self.location(),
            criteria: self.query.criteria.clone(),
            page,
            outcome,
            saved: self.saved.clone(),
            show_saved_only: self.show_saved_only,
            notice: self.save_notice.clone().or_else(|| self.load_notice.clone()),
        }
    }

    fn select(&self, deals: &[Deal]) -> Page<Deal> {
        let mut rows: Vec<&Deal> = deals
            .iter()
            .filter(|deal| self.visibility.is_visible(deal, &self.context))
            .collect();
        retain_matching(&mut rows, &self.query.criteria);
        let mut rows = restrict_to_saved(rows, &self.saved, self.show_saved_only);
        order_by_recency(&mut rows);
        paginate(&rows, self.query.page).map(Deal::clone)
    }
}
