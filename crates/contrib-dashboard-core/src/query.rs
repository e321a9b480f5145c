//! Query engine behind `/api/contributions`.
//!
//! # Algorithm
//!
//! 1. Keep records passing every supplied filter (input order preserved).
//! 2. Stable-sort the survivors by `cycle`, highest first. Any JSON number
//!    counts as a cycle, so `3.0` sorts with `3`.
//! 3. Count them: that is `total`, independent of pagination.
//! 4. Slice `[offset, offset + limit)`, clamped to what is available.
//!
//! Filters compare case-insensitively after the record defaults have been
//! applied, so a record without `language` matches `language=unknown`.

use serde::Serialize;

use crate::models::{ContributionDocument, ContributionRecord};

pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_LIMIT: usize = 100;

/// Effective page window after lenient parsing and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Parse raw `offset` / `limit` query values.
    ///
    /// If either value is present but not an integer, both fall back to
    /// their defaults. Negative values clamp to zero, so a negative limit
    /// yields an empty page.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Self {
        let offset = offset.map(|s| s.trim().parse::<i64>()).transpose();
        let limit = limit.map(|s| s.trim().parse::<i64>()).transpose();

        match (offset, limit) {
            (Ok(offset), Ok(limit)) => Self::clamped(
                offset.unwrap_or(DEFAULT_OFFSET as i64),
                limit.unwrap_or(DEFAULT_LIMIT as i64),
            ),
            _ => Self::default(),
        }
    }

    pub fn clamped(offset: i64, limit: i64) -> Self {
        let to_usize = |n: i64| usize::try_from(n.max(0)).unwrap_or(usize::MAX);
        Self {
            offset: to_usize(offset),
            limit: to_usize(limit),
        }
    }
}

/// Filters and page window for one `/api/contributions` request.
///
/// `None` means "no constraint" for every filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionQuery {
    pub status: Option<String>,
    /// The `type` query parameter.
    pub kind: Option<String>,
    pub language: Option<String>,
    /// Substring matched against `repository`.
    pub repo: Option<String>,
    pub pagination: Pagination,
}

impl ContributionQuery {
    /// Build a query from decoded query-string pairs.
    ///
    /// The first occurrence of a key wins and blank values are ignored.
    /// Unknown keys are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        let mut offset: Option<String> = None;
        let mut limit: Option<String> = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "status" => &mut query.status,
                "type" => &mut query.kind,
                "language" => &mut query.language,
                "repo" => &mut query.repo,
                "offset" => &mut offset,
                "limit" => &mut limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        query.pagination = Pagination::parse(offset.as_deref(), limit.as_deref());
        query
    }
}

/// Normalised filter values, case-folded once per query.
struct Filter {
    status: Option<String>,
    kind: Option<String>,
    language: Option<String>,
    repo: Option<String>,
}

impl Filter {
    fn new(query: &ContributionQuery) -> Self {
        Self {
            status: query.status.as_deref().map(str::to_uppercase),
            kind: query.kind.as_deref().map(str::to_lowercase),
            language: query.language.as_deref().map(str::to_lowercase),
            repo: query.repo.as_deref().map(str::to_lowercase),
        }
    }

    fn matches(&self, record: &ContributionRecord<'_>) -> bool {
        if let Some(status) = &self.status {
            if record.status().to_uppercase() != *status {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if record.kind().to_lowercase() != *kind {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if record.language().to_lowercase() != *language {
                return false;
            }
        }
        if let Some(repo) = &self.repo {
            if !record.repository().to_lowercase().contains(repo.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One page of matching records plus the size of the full match set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionPage<'a> {
    pub contributions: Vec<ContributionRecord<'a>>,
    pub total: usize,
}

/// Filter, sort, and paginate the document's contributions.
///
/// Borrows records from `document`; nothing is copied or mutated. Entries
/// that are not JSON objects take part with every field at its default.
pub fn filter_contributions<'a>(
    document: &'a ContributionDocument,
    query: &ContributionQuery,
) -> ContributionPage<'a> {
    let filter = Filter::new(query);

    let mut matched: Vec<ContributionRecord<'a>> = document
        .contributions()
        .filter(|r| filter.matches(r))
        .collect();

    // sort_by is stable: equal cycles keep file order.
    matched.sort_by(|a, b| b.cycle_key().total_cmp(&a.cycle_key()));

    let total = matched.len();
    let Pagination { offset, limit } = query.pagination;
    let contributions = matched.into_iter().skip(offset).take(limit).collect();

    ContributionPage {
        contributions,
        total,
    }
}
