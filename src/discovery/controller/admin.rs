use super::{Candidates, ViewOutcome};
use crate::discovery::predicate::contains_folded;
use crate::discovery::sort::{sort_deals, SortKey, SortState};
use crate::discovery::visibility::VisibilityContext;
use crate::models::Deal;
use crate::sources::DealSource;
use std::sync::Arc;
use tracing::{error, info};

/// Clickable headers of the admin deals table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminColumn {
    Property,
    Location,
    DealType,
    Status,
    EntryArv,
    Beds,
    Wholesaler,
    Listed,
}

impl AdminColumn {
    pub const ALL: [AdminColumn; 8] = [
        AdminColumn::Property,
        AdminColumn::Location,
        AdminColumn::DealType,
        AdminColumn::Status,
        AdminColumn::EntryArv,
        AdminColumn::Beds,
        AdminColumn::Wholesaler,
        AdminColumn::Listed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminColumn::Property => "Property",
            AdminColumn::Location => "Location",
            AdminColumn::DealType => "Type",
            AdminColumn::Status => "Status",
            AdminColumn::EntryArv => "Entry / ARV",
            AdminColumn::Beds => "Beds",
            AdminColumn::Wholesaler => "Wholesaler",
            AdminColumn::Listed => "Listed",
        }
    }

    pub fn sort_key(&self) -> SortKey {
        match self {
            AdminColumn::Property => SortKey::Title,
            AdminColumn::Location => SortKey::PropertyCity,
            AdminColumn::DealType => SortKey::DealType,
            AdminColumn::Status => SortKey::Status,
            AdminColumn::EntryArv => SortKey::AskingPrice,
            AdminColumn::Beds => SortKey::Bedrooms,
            AdminColumn::Wholesaler => SortKey::Wholesaler,
            AdminColumn::Listed => SortKey::CreatedAt,
        }
    }

    /// Look a header up by its label, ignoring case and surrounding spaces
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.label().eq_ignore_ascii_case(label))
    }
}

/// Full, unpaginated deal table for administrators.
///
/// Search here is local component state and never reaches the URL.
pub struct AdminTable {
    source: Arc<dyn DealSource>,
    context: VisibilityContext,
    candidates: Candidates,
    search: String,
    sort: Option<SortState>,
}

impl AdminTable {
    pub fn new(source: Arc<dyn DealSource>, context: VisibilityContext) -> Self {
        Self {
            source,
            context,
            candidates: Candidates::NotLoaded,
            search: String::new(),
            sort: None,
        }
    }

    /// Fetch every deal, regardless of status. A reload replaces the rows
    /// but keeps the search text and sort.
    pub async fn load(&mut self) -> ViewOutcome {
        self.candidates = match self.source.fetch_candidates(&self.context).await {
            Ok(deals) => {
                info!("📋 Admin table loaded {} deals", deals.len());
                Candidates::Loaded(deals)
            }
            Err(err) => {
                let detail = format!("{:#}", err);
                error!(error = %detail, "Failed to load admin deals");
                Candidates::Failed(err.to_string())
            }
        };
        self.outcome()
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Header click: same column flips direction, another column starts ascending
    pub fn click_header(&mut self, column: AdminColumn) -> SortState {
        let next = SortState::select(self.sort, column.sort_key());
        self.sort = Some(next);
        next
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Rows to display: locally searched, then sorted
    pub fn rows(&self) -> Vec<&Deal> {
        let Candidates::Loaded(deals) = &self.candidates else {
            return Vec::new();
        };

        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&Deal> = deals
            .iter()
            .filter(|deal| needle.is_empty() || admin_keyword_matches(deal, &needle))
            .collect();
        sort_deals(&mut rows, self.sort);
        rows
    }

    pub fn outcome(&self) -> ViewOutcome {
        match &self.candidates {
            Candidates::NotLoaded => ViewOutcome::Loading,
            Candidates::Failed(message) => ViewOutcome::LoadFailed {
                message: message.clone(),
            },
            Candidates::Loaded(_) if self.rows().is_empty() => ViewOutcome::NoMatches,
            Candidates::Loaded(_) => ViewOutcome::Results,
        }
    }
}

fn admin_keyword_matches(deal: &Deal, needle: &str) -> bool {
    [
        deal.title.as_deref(),
        deal.property_address.as_deref(),
        Some(deal.wholesaler_name()),
    ]
    .into_iter()
    .flatten()
    .any(|field| contains_folded(field, needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::sort::SortDirection;
    use crate::discovery::visibility::ViewerRole;
    use crate::models::{DealStatus, OwnerProfile};
    use crate::sources::MemorySource;
    use chrono::Utc;

    fn deal(id: &str, price: f64, title: &str, owner: &str) -> Deal {
        let mut deal = Deal::new(id, "u", price, Utc::now());
        deal.title = Some(title.to_string());
        deal.status = Some(DealStatus::Draft);
        deal.owner = Some(OwnerProfile {
            id: "u".into(),
            full_name: Some(owner.to_string()),
            email: None,
        });
        deal
    }

    fn table(deals: Vec<Deal>) -> (AdminTable, MemorySource) {
        let source = MemorySource::new(deals);
        let table = AdminTable::new(
            Arc::new(source.clone()),
            VisibilityContext::viewer("admin", ViewerRole::Admin),
        );
        (table, source)
    }

    fn ids(rows: &[&Deal]) -> Vec<String> {
        rows.iter().map(|d| d.id.clone()).collect()
    }

    #[tokio::test]
    async fn entry_arv_header_toggles_then_resets() {
        let (mut table, _) = table(vec![
            deal("b", 200_000.0, "Bungalow", "Zoe"),
            deal("a", 90_000.0, "Cottage", "Amir"),
            deal("c", 350_000.0, "Acreage", "Lee"),
        ]);
        assert_eq!(table.load().await, ViewOutcome::Results);
        assert_eq!(ids(&table.rows()), vec!["b", "a", "c"]);

        let header = AdminColumn::from_label("Entry / ARV").unwrap();
        assert_eq!(table.click_header(header).direction, SortDirection::Ascending);
        assert_eq!(ids(&table.rows()), vec!["a", "b", "c"]);

        assert_eq!(table.click_header(header).direction, SortDirection::Descending);
        assert_eq!(ids(&table.rows()), vec!["c", "b", "a"]);

        let next = table.click_header(AdminColumn::Property);
        assert_eq!(next, SortState::ascending(SortKey::Title));
        assert_eq!(ids(&table.rows()), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn search_covers_owner_name_and_ignores_status() {
        let (mut table, _) = table(vec![
            deal("a", 1.0, "Oak Lane Duplex", "Zoe"),
            deal("b", 1.0, "Ranch", "Oakley Grant"),
            deal("c", 1.0, "Maple House", "Sam"),
        ]);
        table.load().await;
        table.set_search("OAK");
        assert_eq!(ids(&table.rows()), vec!["a", "b"]);

        table.set_search("nothing like this");
        assert_eq!(table.outcome(), ViewOutcome::NoMatches);
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let (mut table, source) = table(vec![deal("a", 1.0, "x", "y")]);
        source.set_failing(true);
        assert!(matches!(table.load().await, ViewOutcome::LoadFailed { .. }));
        assert!(table.rows().is_empty());
    }

    #[tokio::test]
    async fn reload_keeps_search_and_sort() {
        let (mut table, source) = table(vec![deal("a", 5.0, "Oak One", "Zoe")]);
        table.load().await;
        table.set_search("oak");
        table.click_header(AdminColumn::EntryArv);
        table.click_header(AdminColumn::EntryArv);

        source.replace(vec![
            deal("a", 5.0, "Oak One", "Zoe"),
            deal("b", 9.0, "Oak Two", "Zoe"),
            deal("c", 7.0, "Maple", "Zoe"),
        ]);
        assert_eq!(table.load().await, ViewOutcome::Results);
        assert_eq!(ids(&table.rows()), vec!["b", "a"]);
        assert_eq!(
            table.sort_state(),
            Some(SortState {
                key: SortKey::AskingPrice,
                direction: SortDirection::Descending,
            })
        );
    }
}
