//! Aggregate statistics behind `/api/stats`.
//!
//! The response starts from the document's precomputed `stats` mapping.
//! When the document has at least one contribution, three breakdowns are
//! layered on top: `languages`, `types`, and `status_distribution`. With no
//! contributions those keys are left out entirely rather than sent empty.
//! A `stats` value that is not an object starts the response empty.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::{ContributionDocument, Status};

/// Counts per recognised status. Serialised in `MERGED`, `OPEN`, `CLOSED`
/// order with all three keys always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    #[serde(rename = "MERGED")]
    pub merged: u64,
    #[serde(rename = "OPEN")]
    pub open: u64,
    #[serde(rename = "CLOSED")]
    pub closed: u64,
}

impl StatusDistribution {
    fn record(&mut self, status: Status) {
        match status {
            Status::Merged => self.merged += 1,
            Status::Open => self.open += 1,
            Status::Closed => self.closed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.merged + self.open + self.closed
    }
}

/// Body of `/api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    /// Copy of the document's `stats`, minus any keys shadowed below.
    #[serde(flatten)]
    pub base: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<BTreeMap<String, u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<BTreeMap<String, u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_distribution: Option<StatusDistribution>,
}

const DERIVED_KEYS: [&str; 3] = ["languages", "types", "status_distribution"];

/// Compute the stats response for a document without touching it.
pub fn compute_stats(document: &ContributionDocument) -> StatsResponse {
    let mut base = document.stats().cloned().unwrap_or_default();

    if document.contribution_count() == 0 {
        return StatsResponse {
            base,
            languages: None,
            types: None,
            status_distribution: None,
        };
    }

    let mut languages: BTreeMap<String, u64> = BTreeMap::new();
    let mut types: BTreeMap<String, u64> = BTreeMap::new();
    let mut statuses = StatusDistribution::default();

    for record in document.contributions() {
        *languages.entry(record.language().to_string()).or_insert(0) += 1;
        *types.entry(record.kind().to_string()).or_insert(0) += 1;
        if let Some(status) = record.parsed_status() {
            statuses.record(status);
        }
    }

    for key in DERIVED_KEYS {
        base.remove(key);
    }

    StatsResponse {
        base,
        languages: Some(languages),
        types: Some(types),
        status_distribution: Some(statuses),
    }
}
