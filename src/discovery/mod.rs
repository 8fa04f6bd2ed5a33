//! The deal discovery engine.
//!
//! URL query → [`codec`] → [`FilterCriteria`] → [`filter`] → saved overlay →
//! [`sort`] → [`paginate`] → rendered page. The [`controller`] module wires
//! those steps into the marketplace and admin surfaces.

pub mod codec;
pub mod controller;
pub mod criteria;
pub mod filter;
pub mod paginate;
pub mod predicate;
pub mod render;
pub mod saved;
pub mod sort;
pub mod visibility;

pub use codec::{decode, encode, DiscoveryQuery, QueryMap};
pub use criteria::{FilterCriteria, Range, Threshold};
pub use filter::{filter, retain_matching};
pub use paginate::{paginate, Page, PageRequest};
pub use predicate::matches;
pub use saved::{restrict_to_saved, SavedSet, SavedStore};
pub use sort::{sort_deals, SortDirection, SortKey, SortState};
pub use visibility::{RoleVisibility, ViewerRole, VisibilityContext, VisibilityRule};
