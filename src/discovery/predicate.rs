//! Facet matching for a single deal.
//!
//! The predicate only looks at facets. Who may see a deal is decided
//! separately by the visibility rule before any criteria are applied.

use super::criteria::{FilterCriteria, Range, Threshold};
use crate::models::{facet_number, Deal, FacetValue};

/// Tolerance for exact bathroom counts, which are stored as decimals
pub const BATHROOM_EPSILON: f64 = 0.01;

/// Does `deal` satisfy every present criterion?
pub fn matches(deal: &Deal, criteria: &FilterCriteria) -> bool {
    threshold_matches(deal.bedrooms.as_ref(), criteria.bedrooms, 0.0)
        && threshold_matches(deal.bathrooms.as_ref(), criteria.bathrooms, BATHROOM_EPSILON)
        && range_matches(facet_number(deal.square_feet.as_ref()), criteria.square_feet)
        && range_matches(facet_number(deal.lot_size_acres.as_ref()), criteria.lot_size)
        && range_matches(deal.entry_cost(), criteria.entry_price)
        && criteria
            .deal_type
            .map_or(true, |wanted| deal.deal_type == Some(wanted))
        && text_equals(deal.property_city.as_deref(), criteria.city.as_deref())
        && text_equals(deal.property_zip.as_deref(), criteria.zipcode.as_deref())
        && criteria
            .search
            .as_deref()
            .map_or(true, |needle| keyword_matches(deal, needle))
}

/// Case-insensitive substring match against title, address and city
pub fn keyword_matches(deal: &Deal, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    [
        deal.title.as_deref(),
        deal.property_address.as_deref(),
        deal.property_city.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| contains_folded(field, &needle))
}

/// `haystack` contains an already lower-cased `needle`, ignoring case
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn threshold_matches(facet: Option<&FacetValue>, threshold: Option<Threshold>, epsilon: f64) -> bool {
    let Some(threshold) = threshold else {
        return true;
    };
    facet_number(facet).is_some_and(|value| threshold.accepts(value, epsilon))
}

fn range_matches(value: Option<f64>, range: Option<Range>) -> bool {
    match range {
        None => true,
        Some(range) if range.is_unbounded() => true,
        Some(range) => value.is_some_and(|v| range.contains(v)),
    }
}

fn text_equals(field: Option<&str>, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    field.is_some_and(|value| value.trim().to_lowercase() == wanted.trim().to_lowercase())
}
