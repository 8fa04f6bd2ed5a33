//! Deal Scout: search, filter, sort and paginate wholesale real-estate deals,
//! with shareable URL state and per-viewer saved deals.

pub mod config;
pub mod discovery;
pub mod models;
pub mod sources;
