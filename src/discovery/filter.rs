use super::criteria::FilterCriteria;
use super::predicate::matches;
use crate::models::Deal;
use std::borrow::Borrow;

/// Select the deals matching `criteria`, keeping their relative order
pub fn filter<'a, I>(deals: I, criteria: &FilterCriteria) -> Vec<&'a Deal>
where
    I: IntoIterator<Item = &'a Deal>,
{
    deals
        .into_iter()
        .filter(|deal| matches(deal, criteria))
        .collect()
}

/// In-place variant of [`filter`] for owned working sets
pub fn retain_matching<T: Borrow<Deal>>(deals: &mut Vec<T>, criteria: &FilterCriteria) {
    if criteria.is_empty() {
        return;
    }
    deals.retain(|deal| matches(deal.borrow(), criteria));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::criteria::{Range, Threshold};
    use crate::models::FacetValue;
    use chrono::Utc;

    fn bedrooms(id: &str, value: Option<f64>) -> Deal {
        let mut deal = Deal::new(id, "owner", 100_000.0, Utc::now());
        deal.bedrooms = value.map(FacetValue::Number);
        deal
    }

    fn sample() -> Vec<Deal> {
        vec![
            bedrooms("three", Some(3.0)),
            bedrooms("two", Some(2.0)),
            bedrooms("unknown", None),
        ]
    }

    fn ids(deals: &[&Deal]) -> Vec<String> {
        deals.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn minimum_bedrooms_scenario() {
        let deals = sample();
        let criteria = FilterCriteria::default().with_bedrooms(Threshold::at_least(3.0));
        assert_eq!(ids(&filter(&deals, &criteria)), vec!["three"]);
    }

    #[test]
    fn exact_bedrooms_scenario() {
        let deals = sample();
        let criteria = FilterCriteria::default().with_bedrooms(Threshold::exactly(2.0));
        assert_eq!(ids(&filter(&deals, &criteria)), vec!["two"]);
    }

    #[test]
    fn empty_criteria_is_identity() {
        let deals = sample();
        let all: Vec<&Deal> = deals.iter().collect();
        assert_eq!(filter(&deals, &FilterCriteria::default()), all);
    }

    #[test]
    fn adding_criteria_only_narrows() {
        let mut deals = sample();
        deals[0].square_feet = Some(1200.0.into());
        deals[1].square_feet = Some(900.0.into());

        let loose = FilterCriteria::default().with_bedrooms(Threshold::at_least(1.0));
        let strict = loose.clone().with_square_feet(Range::at_least(1000.0));

        let loose_ids = ids(&filter(&deals, &loose));
        let strict_ids = ids(&filter(&deals, &strict));
        assert!(strict_ids.iter().all(|id| loose_ids.contains(id)));
        assert_eq!(strict_ids, vec!["three"]);
    }

    #[test]
    fn raising_threshold_never_adds_matches() {
        let deals: Vec<Deal> = (0..8)
            .map(|n| bedrooms(&n.to_string(), Some(f64::from(n % 5))))
            .collect();
        let mut previous = usize::MAX;
        for min in 0..6 {
            let at_least = filter(
                &deals,
                &FilterCriteria::default().with_bedrooms(Threshold::at_least(f64::from(min))),
            )
            .len();
            let exact = filter(
                &deals,
                &FilterCriteria::default().with_bedrooms(Threshold::exactly(f64::from(min))),
            )
            .len();
            assert!(at_least <= previous);
            assert!(exact <= at_least);
            previous = at_least;
        }
    }

    #[test]
    fn retain_matching_keeps_order() {
        let mut deals = vec![
            bedrooms("a", Some(4.0)),
            bedrooms("b", Some(1.0)),
            bedrooms("c", Some(5.0)),
        ];
        retain_matching(
            &mut deals,
            &FilterCriteria::default().with_bedrooms(Threshold::at_least(2.0)),
        );
        let kept: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(kept, vec!["a", "c"]);
    }
}
