//! Mapping between [`FilterCriteria`] and the marketplace URL query string.
//!
//! The key scheme is shared with every bookmarked or shared marketplace link,
//! so it is fixed:
//!
//! | Criterion   | Keys                               |
//! |-------------|------------------------------------|
//! | bedrooms    | `bedrooms`, `exactBedrooms`        |
//! | bathrooms   | `bathrooms`, `exactBathrooms`      |
//! | square feet | `minSqFt`, `maxSqFt`               |
//! | lot size    | `minLotSize`, `maxLotSize`         |
//! | entry price | `minEntryPrice`, `maxEntryPrice`   |
//! | deal type   | `dealType`                         |
//! | city / zip  | `city`, `zipcode`                  |
//! | keyword     | `search`                           |
//! | paging      | `page`, `limit`                    |
//!
//! Decoding never fails. A missing, blank, malformed, negative or unknown
//! value leaves its criterion absent. Unrecognized keys are ignored.

use super::criteria::{FilterCriteria, Range, Threshold};
use super::paginate::{PageRequest, DEFAULT_LIMIT};
use crate::models::DealType;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Flat string-keyed query, as carried in a URL
pub type QueryMap = BTreeMap<String, String>;

pub const BEDROOMS: &str = "bedrooms";
pub const EXACT_BEDROOMS: &str = "exactBedrooms";
pub const BATHROOMS: &str = "bathrooms";
pub const EXACT_BATHROOMS: &str = "exactBathrooms";
pub const MIN_SQFT: &str = "minSqFt";
pub const MAX_SQFT: &str = "maxSqFt";
pub const MIN_LOT_SIZE: &str = "minLotSize";
pub const MAX_LOT_SIZE: &str = "maxLotSize";
pub const DEAL_TYPE: &str = "dealType";
pub const MIN_ENTRY_PRICE: &str = "minEntryPrice";
pub const MAX_ENTRY_PRICE: &str = "maxEntryPrice";
pub const CITY: &str = "city";
pub const ZIPCODE: &str = "zipcode";
pub const SEARCH: &str = "search";
pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";

/// Decode filter criteria from a query mapping
pub fn decode(query: &QueryMap) -> FilterCriteria {
    FilterCriteria {
        bedrooms: decode_threshold(query, BEDROOMS, EXACT_BEDROOMS),
        bathrooms: decode_threshold(query, BATHROOMS, EXACT_BATHROOMS),
        square_feet: decode_range(query, MIN_SQFT, MAX_SQFT),
        lot_size: decode_range(query, MIN_LOT_SIZE, MAX_LOT_SIZE),
        entry_price: decode_range(query, MIN_ENTRY_PRICE, MAX_ENTRY_PRICE),
        deal_type: text(query, DEAL_TYPE).and_then(|raw| {
            let parsed = DealType::parse(raw);
            if parsed.is_none() {
                debug!(value = raw, "Ignoring unknown deal type");
            }
            parsed
        }),
        city: text(query, CITY).map(str::to_string),
        zipcode: text(query, ZIPCODE).map(str::to_string),
        search: text(query, SEARCH).map(str::to_string),
    }
}

/// Encode filter criteria, omitting every absent criterion
pub fn encode(criteria: &FilterCriteria) -> QueryMap {
    let mut query = QueryMap::new();

    encode_threshold(&mut query, criteria.bedrooms, BEDROOMS, EXACT_BEDROOMS);
    encode_threshold(&mut query, criteria.bathrooms, BATHROOMS, EXACT_BATHROOMS);
    encode_range(&mut query, criteria.square_feet, MIN_SQFT, MAX_SQFT);
    encode_range(&mut query, criteria.lot_size, MIN_LOT_SIZE, MAX_LOT_SIZE);
    encode_range(&mut query, criteria.entry_price, MIN_ENTRY_PRICE, MAX_ENTRY_PRICE);

    if let Some(deal_type) = criteria.deal_type {
        query.insert(DEAL_TYPE.to_string(), deal_type.as_str().to_string());
    }
    for (key, value) in [
        (CITY, &criteria.city),
        (ZIPCODE, &criteria.zipcode),
        (SEARCH, &criteria.search),
    ] {
        if let Some(value) = value {
            query.insert(key.to_string(), value.clone());
        }
    }

    query
}

/// Decode `page`/`limit`. Clamping is left to the paginator.
pub fn decode_page(query: &QueryMap) -> PageRequest {
    let page = text(query, PAGE)
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|p| p.max(1) as usize)
        .unwrap_or(1);
    let limit = text(query, LIMIT)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT);
    PageRequest { page, limit }
}

/// Write `page`/`limit`, skipping values equal to the defaults
pub fn encode_page(query: &mut QueryMap, request: PageRequest) {
    encode_page_with_default(query, request, DEFAULT_LIMIT);
}

/// Like [`encode_page`], for a reader that fills a missing `limit` with
/// `default_limit`
pub fn encode_page_with_default(query: &mut QueryMap, request: PageRequest, default_limit: usize) {
    if request.page != 1 {
        query.insert(PAGE.to_string(), request.page.to_string());
    }
    if request.limit != default_limit {
        query.insert(LIMIT.to_string(), request.limit.to_string());
    }
}

/// Parse a raw `application/x-www-form-urlencoded` query string.
///
/// A leading `?` is accepted. When a key repeats, the last value wins.
pub fn parse_query(raw: &str) -> QueryMap {
    let raw = raw.trim().trim_start_matches('?');
    match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
        Ok(pairs) => pairs.into_iter().collect(),
        Err(err) => {
            debug!(error = %err, "Discarding malformed query string");
            QueryMap::new()
        }
    }
}

/// Serialize a query mapping into a URL query string (without `?`)
pub fn to_query_string(query: &QueryMap) -> String {
    serde_urlencoded::to_string(query).unwrap_or_else(|err| {
        warn!(error = %err, "Failed to serialize query string");
        String::new()
    })
}

/// Everything the marketplace URL carries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryQuery {
    pub criteria: FilterCriteria,
    pub page: PageRequest,
}

impl DiscoveryQuery {
    pub fn new(criteria: FilterCriteria, page: PageRequest) -> Self {
        Self { criteria, page }
    }

    pub fn from_map(query: &QueryMap) -> Self {
        Self {
            criteria: decode(query),
            page: decode_page(query),
        }
    }

    pub fn from_query_str(raw: &str) -> Self {
        Self::from_map(&parse_query(raw))
    }

    pub fn to_map(&self) -> QueryMap {
        let mut query = encode(&self.criteria);
        encode_page(&mut query, self.page);
        query
    }

    pub fn to_query_string(&self) -> String {
        to_query_string(&self.to_map())
    }

    /// Full shareable location for this query under `base_path`
    pub fn href(&self, base_path: &str) -> String {
        self.href_with_default_limit(base_path, DEFAULT_LIMIT)
    }

    /// Shareable location for a reader whose page size without a `limit`
    /// key is `default_limit`
    pub fn href_with_default_limit(&self, base_path: &str, default_limit: usize) -> String {
        let mut map = encode(&self.criteria);
        encode_page_with_default(&mut map, self.page, default_limit);
        let query = to_query_string(&map);
        if query.is_empty() {
            base_path.to_string()
        } else {
            format!("{}?{}", base_path, query)
        }
    }
}

fn text<'a>(query: &'a QueryMap, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn number(query: &QueryMap, key: &str) -> Option<f64> {
    let raw = text(query, key)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            debug!(key, value = raw, "Ignoring malformed numeric filter");
            None
        }
    }
}

fn flag(query: &QueryMap, key: &str) -> bool {
    text(query, key)
        .map(|raw| {
            let raw = raw.trim();
            raw.eq_ignore_ascii_case("true") || raw == "1"
        })
        .unwrap_or(false)
}

fn decode_threshold(query: &QueryMap, key: &str, exact_key: &str) -> Option<Threshold> {
    number(query, key).map(|min| Threshold {
        min,
        exact: flag(query, exact_key),
    })
}

fn decode_range(query: &QueryMap, min_key: &str, max_key: &str) -> Option<Range> {
    let range = Range {
        min: number(query, min_key),
        max: number(query, max_key),
    };
    (!range.is_unbounded()).then_some(range)
}

fn encode_threshold(query: &mut QueryMap, threshold: Option<Threshold>, key: &str, exact_key: &str) {
    let Some(threshold) = threshold else {
        return;
    };
    query.insert(key.to_string(), threshold.min.to_string());
    if threshold.exact {
        query.insert(exact_key.to_string(), "true".to_string());
    }
}

fn encode_range(query: &mut QueryMap, range: Option<Range>, min_key: &str, max_key: &str) {
    let Some(range) = range else {
        return;
    };
    if let Some(min) = range.min {
        query.insert(min_key.to_string(), min.to_string());
    }
    if let Some(max) = range.max {
        query.insert(max_key.to_string(), max.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn square_feet_range_encodes_to_min_max_keys() {
        let criteria = FilterCriteria::default().with_square_feet(Range::between(1000.0, 2000.0));
        let query = encode(&criteria);
        assert_eq!(query, map(&[("minSqFt", "1000"), ("maxSqFt", "2000")]));
        assert_eq!(decode(&query), criteria);
    }

    #[test]
    fn no_filters_is_an_empty_query() {
        assert!(encode(&FilterCriteria::default()).is_empty());
        assert_eq!(decode(&QueryMap::new()), FilterCriteria::default());
        assert_eq!(DiscoveryQuery::default().to_query_string(), "");
    }

    #[test]
    fn threshold_uses_value_and_exact_keys() {
        let criteria = FilterCriteria::default()
            .with_bedrooms(Threshold::exactly(3.0))
            .with_bathrooms(Threshold::at_least(1.5));
        let query = encode(&criteria);
        assert_eq!(
            query,
            map(&[("bedrooms", "3"), ("exactBedrooms", "true"), ("bathrooms", "1.5")])
        );
        assert_eq!(decode(&query), criteria);
    }

    #[test]
    fn representable_criteria_round_trip() {
        let samples = vec![
            FilterCriteria::default().with_search("oak street"),
            FilterCriteria::default().with_lot_size(Range::at_least(0.25)),
            FilterCriteria::default().with_entry_price(Range::at_most(35_000.0)),
            FilterCriteria::default()
                .with_deal_type(DealType::SellerFinance)
                .with_city("  San Antonio ")
                .with_zipcode("78201"),
            FilterCriteria::default()
                .with_bedrooms(Threshold::at_least(0.0))
                .with_bathrooms(Threshold::exactly(2.5))
                .with_square_feet(Range::between(800.0, 650.0))
                .with_entry_price(Range::between(10_000.5, 40_000.0))
                .with_search("Maple & Co"),
        ];
        for criteria in samples {
            assert_eq!(decode(&encode(&criteria)), criteria);
            let via_url = DiscoveryQuery::from_query_str(&DiscoveryQuery::new(
                criteria.clone(),
                PageRequest::default(),
            )
            .to_query_string());
            assert_eq!(via_url.criteria, criteria);
        }
    }

    #[test]
    fn malformed_values_are_absent() {
        let query = map(&[
            ("bedrooms", "three"),
            ("exactBathrooms", "true"),
            ("minSqFt", "-5"),
            ("maxSqFt", "NaN"),
            ("dealType", "wholesale"),
            ("city", "   "),
            ("minLotSize", ""),
        ]);
        assert_eq!(decode(&query), FilterCriteria::default());
    }

    #[test]
    fn half_malformed_range_keeps_valid_bound() {
        let query = map(&[("minEntryPrice", "abc"), ("maxEntryPrice", "50000")]);
        assert_eq!(decode(&query).entry_price, Some(Range::at_most(50_000.0)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let query = map(&[("utm_source", "newsletter"), ("city", "Dallas")]);
        assert_eq!(decode(&query), FilterCriteria::default().with_city("Dallas"));
    }

    #[test]
    fn deal_type_decodes_case_insensitively() {
        let query = map(&[("dealType", "MORTGAGE_TAKEOVER")]);
        assert_eq!(decode(&query).deal_type, Some(DealType::MortgageTakeover));
    }

    #[test]
    fn page_keys_are_decoded_and_defaulted() {
        assert_eq!(decode_page(&QueryMap::new()), PageRequest::default());
        assert_eq!(decode_page(&map(&[("page", "-2"), ("limit", "x")])), PageRequest::default());
        assert_eq!(
            decode_page(&map(&[("page", "3"), ("limit", "24")])),
            PageRequest::new(3, 24)
        );
    }

    #[test]
    fn query_string_parsing_handles_prefix_and_escapes() {
        let parsed = DiscoveryQuery::from_query_str("?search=oak+street&city=San%20Antonio&page=2&page=4");
        assert_eq!(parsed.criteria.search.as_deref(), Some("oak street"));
        assert_eq!(parsed.criteria.city.as_deref(), Some("San Antonio"));
        assert_eq!(parsed.page.page, 4);
    }

    #[test]
    fn href_omits_question_mark_without_filters() {
        assert_eq!(DiscoveryQuery::default().href("/marketplace"), "/marketplace");
        let query = DiscoveryQuery::new(
            FilterCriteria::default().with_city("Austin"),
            PageRequest::new(2, DEFAULT_LIMIT),
        );
        assert_eq!(query.href("/marketplace"), "/marketplace?city=Austin&page=2");
    }

    #[test]
    fn limit_is_written_relative_to_the_reader_default() {
        let query = DiscoveryQuery::new(FilterCriteria::default(), PageRequest::new(1, DEFAULT_LIMIT));
        assert_eq!(query.href_with_default_limit("/marketplace", 20), "/marketplace?limit=12");
        assert_eq!(query.href_with_default_limit("/marketplace", DEFAULT_LIMIT), "/marketplace");

        let wide = DiscoveryQuery::new(FilterCriteria::default(), PageRequest::new(1, 20));
        assert_eq!(wide.href_with_default_limit("/marketplace", 20), "/marketplace");
    }
}
