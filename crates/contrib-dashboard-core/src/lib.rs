//! # Contribution Dashboard Core
//!
//! Pure logic for the contribution dashboard: the document model, the
//! query engine behind `/api/contributions`, and the stats aggregation
//! behind `/api/stats`.
//!
//! This crate contains no tokio, filesystem I/O, or HTTP dependencies.
//! Callers load a [`models::ContributionDocument`] however they like and
//! pass it by reference; nothing here mutates it.

pub mod models;
pub mod query;
pub mod stats;
