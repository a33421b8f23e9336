//! Acquisition pipeline for remembrance (adhkar) content.
//!
//! A bundled baseline is overlaid with a persisted snapshot and, when that is
//! missing or stale, with the first remote source that yields usable entries.
//! Remote payloads of varying shape are flattened ([`shape`]), normalized and
//! deduplicated ([`group`], [`category`]) before they reach consumers.

pub mod app;
pub mod baseline;
pub mod category;
pub mod config;
pub mod domain;
pub mod error;
pub mod group;
pub mod output;
pub mod shape;
pub mod source;
pub mod store;
