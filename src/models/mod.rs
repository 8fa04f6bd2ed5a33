use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Share of the asking price a buyer is assumed to bring when a listing
/// carries no explicit entry cost.
pub const DEFAULT_ENTRY_COST_RATIO: f64 = 0.2;

/// How a wholesale deal is structured
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    CashDeal,
    SellerFinance,
    MortgageTakeover,
    TrustAcquisition,
}

impl DealType {
    pub const ALL: [DealType; 4] = [
        DealType::CashDeal,
        DealType::SellerFinance,
        DealType::MortgageTakeover,
        DealType::TrustAcquisition,
    ];

    /// Wire name, as stored by the backend and written into URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::CashDeal => "cash_deal",
            DealType::SellerFinance => "seller_finance",
            DealType::MortgageTakeover => "mortgage_takeover",
            DealType::TrustAcquisition => "trust_acquisition",
        }
    }

    /// Human readable label for tables and cards
    pub fn label(&self) -> &'static str {
        match self {
            DealType::CashDeal => "Cash Deal",
            DealType::SellerFinance => "Seller Finance",
            DealType::MortgageTakeover => "Mortgage Takeover",
            DealType::TrustAcquisition => "Trust Acquisition",
        }
    }

    /// Case-insensitive lookup by wire name. Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Draft,
    PendingReview,
    Active,
    UnderContract,
    Sold,
    Rejected,
    Archived,
}

impl DealStatus {
    pub const ALL: [DealStatus; 7] = [
        DealStatus::Draft,
        DealStatus::PendingReview,
        DealStatus::Active,
        DealStatus::UnderContract,
        DealStatus::Sold,
        DealStatus::Rejected,
        DealStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Draft => "draft",
            DealStatus::PendingReview => "pending_review",
            DealStatus::Active => "active",
            DealStatus::UnderContract => "under_contract",
            DealStatus::Sold => "sold",
            DealStatus::Rejected => "rejected",
            DealStatus::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric facet as it arrives from the backend.
///
/// Postgres `numeric` columns come back as JSON strings, integer columns as
/// JSON numbers, and hand-entered listings occasionally hold free text.
/// Everything goes through [`FacetValue::as_number`]; anything that does not
/// parse to a finite number counts as missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FacetValue {
    Number(f64),
    Text(String),
}

impl FacetValue {
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FacetValue::Number(n) => *n,
            FacetValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for FacetValue {
    fn from(value: f64) -> Self {
        FacetValue::Number(value)
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::Text(value.to_string())
    }
}

/// Coerce an optional facet, treating unparseable values as absent
pub fn facet_number(value: Option<&FacetValue>) -> Option<f64> {
    value.and_then(FacetValue::as_number)
}

/// Profile of the wholesaler who listed a deal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub id: String,
    #[serde(default, alias = "full_name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Core deal data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "property_address")]
    pub property_address: Option<String>,
    #[serde(default, alias = "property_city")]
    pub property_city: Option<String>,
    #[serde(default, alias = "property_state")]
    pub property_state: Option<String>,
    #[serde(default, alias = "property_zip")]
    pub property_zip: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<FacetValue>,
    #[serde(default)]
    pub bathrooms: Option<FacetValue>,
    #[serde(default, alias = "square_feet")]
    pub square_feet: Option<FacetValue>,
    #[serde(default, alias = "lot_size_acres")]
    pub lot_size_acres: Option<FacetValue>,
    #[serde(alias = "asking_price")]
    pub asking_price: FacetValue,
    #[serde(default, alias = "buyer_entry_cost")]
    pub buyer_entry_cost: Option<FacetValue>,
    #[serde(default)]
    pub arv: Option<FacetValue>,
    #[serde(default, alias = "deal_type", deserialize_with = "lenient_deal_type")]
    pub deal_type: Option<DealType>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<DealStatus>,
    #[serde(alias = "owner_id")]
    pub owner_id: String,
    #[serde(default)]
    pub owner: Option<OwnerProfile>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deal {
    /// Create a bare listing with only the required columns set
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        asking_price: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: None,
            property_address: None,
            property_city: None,
            property_state: None,
            property_zip: None,
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
            lot_size_acres: None,
            asking_price: FacetValue::Number(asking_price),
            buyer_entry_cost: None,
            arv: None,
            deal_type: None,
            status: None,
            owner_id: owner_id.into(),
            owner: None,
            description: None,
            images: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    pub fn asking_price(&self) -> Option<f64> {
        self.asking_price.as_number()
    }

    /// What a buyer needs to bring to the table. Falls back to a fixed share
    /// of the asking price when the listing does not state it.
    pub fn entry_cost(&self) -> Option<f64> {
        facet_number(self.buyer_entry_cost.as_ref())
            .or_else(|| self.asking_price().map(|p| p * DEFAULT_ENTRY_COST_RATIO))
    }

    /// Display name of the listing wholesaler: full name, then email
    pub fn wholesaler_name(&self) -> &str {
        let Some(owner) = &self.owner else {
            return "";
        };
        owner
            .full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(owner.email.as_deref())
            .unwrap_or("")
    }
}

fn lenient_deal_type<'de, D>(deserializer: D) -> Result<Option<DealType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(DealType::parse))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<DealStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(DealStatus::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn facet_text_is_coerced() {
        assert_eq!(FacetValue::from("1200").as_number(), Some(1200.0));
        assert_eq!(FacetValue::from(" 2.5 ").as_number(), Some(2.5));
        assert_eq!(FacetValue::from("n/a").as_number(), None);
        assert_eq!(FacetValue::from("").as_number(), None);
        assert_eq!(FacetValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn entry_cost_falls_back_to_share_of_asking_price() {
        let mut deal = Deal::new("d1", "u1", 100_000.0, Utc::now());
        assert_eq!(deal.entry_cost(), Some(20_000.0));

        deal.buyer_entry_cost = Some(FacetValue::from("15000"));
        assert_eq!(deal.entry_cost(), Some(15_000.0));
    }

    #[test]
    fn deserializes_backend_rows_with_unknown_enums() {
        let row = json!({
            "id": "abc",
            "title": "Maple House",
            "property_city": "Austin",
            "bedrooms": 3,
            "bathrooms": "2.5",
            "asking_price": "185000",
            "deal_type": "lease_option",
            "status": "active",
            "owner_id": "u9",
            "owner": { "id": "u9", "full_name": "Dana Reyes" },
            "created_at": "2024-03-01T12:00:00Z"
        });

        let deal: Deal = serde_json::from_value(row).unwrap();
        assert_eq!(deal.property_city.as_deref(), Some("Austin"));
        assert_eq!(facet_number(deal.bathrooms.as_ref()), Some(2.5));
        assert_eq!(deal.asking_price(), Some(185_000.0));
        assert_eq!(deal.deal_type, None);
        assert_eq!(deal.status, Some(DealStatus::Active));
        assert_eq!(deal.wholesaler_name(), "Dana Reyes");
    }

    #[test]
    fn wholesaler_name_falls_back_to_email() {
        let mut deal = Deal::new("d1", "u1", 1.0, Utc::now());
        assert_eq!(deal.wholesaler_name(), "");

        deal.owner = Some(OwnerProfile {
            id: "u1".into(),
            full_name: Some("  ".into()),
            email: Some("w@example.com".into()),
        });
        assert_eq!(deal.wholesaler_name(), "w@example.com");
    }

    #[test]
    fn deal_type_parse_is_case_insensitive() {
        assert_eq!(DealType::parse("Cash_Deal"), Some(DealType::CashDeal));
        assert_eq!(DealType::parse("wholesale"), None);
    }
}
