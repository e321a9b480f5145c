//! Document model for the contribution history file.
//!
//! The on-disk format is a loose contract: any key may be missing or carry
//! an unexpected type. [`ContributionDocument`] keeps the parsed JSON value
//! untouched, and [`ContributionRecord`] borrows one entry of it, exposing
//! typed accessors that substitute the documented defaults.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Schema version written into the empty fallback document.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Precomputed counters present in every fresh `stats` mapping.
pub const STAT_COUNTERS: [&str; 6] = [
    "total_contributions",
    "prs_created",
    "prs_merged",
    "prs_closed",
    "prs_pending",
    "cycles_completed",
];

/// Language reported for records without a `language` field.
pub const DEFAULT_LANGUAGE: &str = "Unknown";

/// Contribution type reported for records without a `type` field.
pub const DEFAULT_KIND: &str = "other";

/// Current UTC time as ISO 8601 with microseconds and a trailing `Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The recognised pull-request states.
///
/// Any other status string is kept on the record but never maps to a
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Merged,
    Open,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Merged, Status::Open, Status::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Merged => "MERGED",
            Status::Open => "OPEN",
            Status::Closed => "CLOSED",
        }
    }

    /// Case-insensitive lookup. Returns `None` for unrecognised values,
    /// including the empty string.
    pub fn parse(raw: &str) -> Option<Status> {
        let upper = raw.to_uppercase();
        Status::ALL.into_iter().find(|s| s.as_str() == upper)
    }
}

/// A view over one entry of the `contributions` array.
///
/// Entries are borrowed from the document as-is. An entry that is not a
/// JSON object answers every accessor with its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContributionRecord<'a>(&'a Value);

impl<'a> ContributionRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// The entry exactly as it appeared in the file.
    pub fn value(&self) -> &'a Value {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Repository name, `""` when absent.
    pub fn repository(&self) -> &'a str {
        self.str_field("repository").unwrap_or("")
    }

    /// Primary language, [`DEFAULT_LANGUAGE`] when absent.
    pub fn language(&self) -> &'a str {
        self.str_field("language").unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Contribution type (the `type` field), [`DEFAULT_KIND`] when absent.
    pub fn kind(&self) -> &'a str {
        self.str_field("type").unwrap_or(DEFAULT_KIND)
    }

    /// Raw status string, `""` when absent.
    pub fn status(&self) -> &'a str {
        self.str_field("status").unwrap_or("")
    }

    pub fn parsed_status(&self) -> Option<Status> {
        Status::parse(self.status())
    }

    /// Work cycle as an integer, 0 when absent. Fractional cycles are
    /// truncated.
    pub fn cycle(&self) -> i64 {
        match self.0.get("cycle") {
            Some(v) => v.as_i64().unwrap_or_else(|| self.cycle_key() as i64),
            None => 0,
        }
    }

    /// Recency sort key. Any JSON number counts, including floats and
    /// integers beyond `i64`; everything else sorts as 0.
    pub fn cycle_key(&self) -> f64 {
        self.0.get("cycle").and_then(Value::as_f64).unwrap_or(0.0)
    }
}

/// The whole contribution history file, kept exactly as parsed.
///
/// No shape is enforced on load: `/api/data` serves the value untouched and
/// the query and stats paths read `stats` and `contributions` through
/// best-effort lookups. A `stats` that is not an object reads as empty, and
/// a `contributions` that is not an array reads as no records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionDocument(Value);

impl Default for ContributionDocument {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for ContributionDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl ContributionDocument {
    /// The canonical document served when the data file is missing or
    /// unreadable: every counter zero, every sequence empty.
    pub fn empty() -> Self {
        let stats: Map<String, Value> = STAT_COUNTERS
            .iter()
            .map(|name| (name.to_string(), Value::from(0)))
            .collect();

        Self(json!({
            "schema_version": SCHEMA_VERSION,
            "last_updated": utc_timestamp(),
            "stats": stats,
            "contributions": [],
            "languages_contributed": [],
            "contribution_types": [],
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The precomputed `stats` mapping, if the document has one.
    pub fn stats(&self) -> Option<&Map<String, Value>> {
        self.0.get("stats").and_then(Value::as_object)
    }

    fn contribution_values(&self) -> &[Value] {
        self.0
            .get("contributions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records in file order.
    pub fn contributions(&self) -> impl Iterator<Item = ContributionRecord<'_>> + '_ {
        self.contribution_values().iter().map(ContributionRecord::new)
    }

    pub fn contribution_count(&self) -> usize {
        self.contribution_values().len()
    }
}
