//! Single-key sorting for deal tables.

use crate::models::{facet_number, Deal};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction
    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A column a deal table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    PropertyAddress,
    PropertyCity,
    DealType,
    Status,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    LotSizeAcres,
    AskingPrice,
    BuyerEntryCost,
    Arv,
    CreatedAt,
    /// Display name of the listing owner
    Wholesaler,
}

impl SortKey {
    pub const ALL: [SortKey; 14] = [
        SortKey::Title,
        SortKey::PropertyAddress,
        SortKey::PropertyCity,
        SortKey::DealType,
        SortKey::Status,
        SortKey::Bedrooms,
        SortKey::Bathrooms,
        SortKey::SquareFeet,
        SortKey::LotSizeAcres,
        SortKey::AskingPrice,
        SortKey::BuyerEntryCost,
        SortKey::Arv,
        SortKey::CreatedAt,
        SortKey::Wholesaler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::PropertyAddress => "propertyAddress",
            SortKey::PropertyCity => "propertyCity",
            SortKey::DealType => "dealType",
            SortKey::Status => "status",
            SortKey::Bedrooms => "bedrooms",
            SortKey::Bathrooms => "bathrooms",
            SortKey::SquareFeet => "squareFeet",
            SortKey::LotSizeAcres => "lotSizeAcres",
            SortKey::AskingPrice => "askingPrice",
            SortKey::BuyerEntryCost => "buyerEntryCost",
            SortKey::Arv => "arv",
            SortKey::CreatedAt => "createdAt",
            SortKey::Wholesaler => "wholesaler",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw))
    }

    /// Comparison value for `deal` under this key.
    ///
    /// Numeric keys treat a missing or unparseable facet as `0`.
    fn extract(&self, deal: &Deal) -> SortValue {
        let text = |value: Option<&str>| SortValue::Text(value.unwrap_or("").to_lowercase());
        let number = |value: Option<f64>| SortValue::Number(value.unwrap_or(0.0));

        match self {
            SortKey::Title => text(deal.title.as_deref()),
            SortKey::PropertyAddress => text(deal.property_address.as_deref()),
            SortKey::PropertyCity => text(deal.property_city.as_deref()),
            SortKey::DealType => text(deal.deal_type.map(|t| t.as_str())),
            SortKey::Status => text(deal.status.map(|s| s.as_str())),
            SortKey::Bedrooms => number(facet_number(deal.bedrooms.as_ref())),
            SortKey::Bathrooms => number(facet_number(deal.bathrooms.as_ref())),
            SortKey::SquareFeet => number(facet_number(deal.square_feet.as_ref())),
            SortKey::LotSizeAcres => number(facet_number(deal.lot_size_acres.as_ref())),
            SortKey::AskingPrice => number(deal.asking_price()),
            SortKey::BuyerEntryCost => number(deal.entry_cost()),
            SortKey::Arv => number(facet_number(deal.arv.as_ref())),
            SortKey::CreatedAt => SortValue::Number(deal.created_at.timestamp_millis() as f64),
            SortKey::Wholesaler => text(Some(deal.wholesaler_name())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current table ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Next state after a header click on `key`: the same key flips direction,
    /// a different key starts ascending.
    pub fn select(current: Option<SortState>, key: SortKey) -> SortState {
        match current {
            Some(state) if state.key == key => SortState::new(key, state.direction.toggle()),
            _ => SortState::ascending(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // A key always yields the same variant
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Order `deals` by `state`. `None` leaves the input order untouched.
///
/// The sort is stable, so rows with equal keys keep their relative order.
pub fn sort_deals<T: Borrow<Deal>>(deals: &mut [T], state: Option<SortState>) {
    let Some(state) = state else {
        return;
    };

    let mut keyed: Vec<(SortValue, usize)> = deals
        .iter()
        .enumerate()
        .map(|(idx, deal)| (state.key.extract(deal.borrow()), idx))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let order: Vec<usize> = keyed.into_iter().map(|(_, idx)| idx).collect();
    apply_permutation(deals, order);
}

/// Default marketplace ordering: newest listings first, stable on ties
pub fn order_by_recency<T: Borrow<Deal>>(deals: &mut [T]) {
    deals.sort_by(|a, b| b.borrow().created_at.cmp(&a.borrow().created_at));
}

/// Rearrange `items` so position `i` holds the element previously at `order[i]`
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for start in 0..items.len() {
        let mut current = start;
        while order[current] != start {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}
