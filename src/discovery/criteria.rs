use crate::models::DealType;

/// Minimum-or-exact numeric criterion (bedrooms, bathrooms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub min: f64,
    /// Require equality instead of "at least"
    pub exact: bool,
}

impl Threshold {
    pub fn at_least(min: f64) -> Self {
        Self { min, exact: false }
    }

    pub fn exactly(value: f64) -> Self {
        Self {
            min: value,
            exact: true,
        }
    }

    /// Whether `value` satisfies the threshold. Equality tolerates `epsilon`.
    pub fn accepts(&self, value: f64, epsilon: f64) -> bool {
        if self.exact {
            (value - self.min).abs() <= epsilon
        } else {
            value >= self.min
        }
    }
}

/// Independent min/max numeric criterion (square feet, lot size, entry price).
///
/// A range with neither bound set narrows nothing and is never written to a
/// query string, so the codec decodes it back as an absent criterion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// The user's query over the deal marketplace. Every field is optional and
/// an absent field never narrows the result set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub bedrooms: Option<Threshold>,
    pub bathrooms: Option<Threshold>,
    pub square_feet: Option<Range>,
    pub lot_size: Option<Range>,
    pub entry_price: Option<Range>,
    pub deal_type: Option<DealType>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of criteria currently narrowing the result set
    pub fn active_count(&self) -> usize {
        [
            self.bedrooms.is_some(),
            self.bathrooms.is_some(),
            self.square_feet.is_some_and(|r| !r.is_unbounded()),
            self.lot_size.is_some_and(|r| !r.is_unbounded()),
            self.entry_price.is_some_and(|r| !r.is_unbounded()),
            self.deal_type.is_some(),
            self.city.is_some(),
            self.zipcode.is_some(),
            self.search.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn with_bedrooms(mut self, threshold: Threshold) -> Self {
        self.bedrooms = Some(threshold);
        self
    }

    pub fn with_bathrooms(mut self, threshold: Threshold) -> Self {
        self.bathrooms = Some(threshold);
        self
    }

    pub fn with_square_feet(mut self, range: Range) -> Self {
        self.square_feet = Some(range);
        self
    }

    pub fn with_lot_size(mut self, range: Range) -> Self {
        self.lot_size = Some(range);
        self
    }

    pub fn with_entry_price(mut self, range: Range) -> Self {
        self.entry_price = Some(range);
        self
    }

    pub fn with_deal_type(mut self, deal_type: DealType) -> Self {
        self.deal_type = Some(deal_type);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_zipcode(mut self, zipcode: impl Into<String>) -> Self {
        self.zipcode = Some(zipcode.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}
