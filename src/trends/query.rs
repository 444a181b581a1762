//! Search input and its validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{TrendError, TrendResult};
use crate::stats::SlugCatalog;

/// One user-initiated keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text; wrap in double quotes for exact-phrase matching
    pub keyword: String,

    /// Optional agency slug restricting exact counts
    pub agency: Option<String>,

    /// Inclusive lower date bound
    pub start: Option<NaiveDate>,

    /// Inclusive upper date bound
    pub end: Option<NaiveDate>,
}

impl SearchQuery {
    /// Create a query over all agencies and all dates
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            agency: None,
            start: None,
            end: None,
        }
    }

    /// Restrict exact counts to one agency
    #[must_use]
    pub fn with_agency(mut self, agency: Option<String>) -> Self {
        self.agency = agency.filter(|slug| !slug.trim().is_empty());
        self
    }

    /// Restrict candidate dates to a range
    #[must_use]
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Reject queries that cannot produce a meaningful search
    ///
    /// # Errors
    ///
    /// Returns `TrendError::InvalidQuery` for a blank keyword, an inverted
    /// date range, or an agency slug missing from `catalog`
    pub fn validate(&self, catalog: Option<&SlugCatalog>) -> TrendResult<()> {
        if self.keyword.trim().is_empty() {
            return Err(TrendError::InvalidQuery("keyword is required".to_string()));
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(TrendError::InvalidQuery(format!(
                    "start date {start} is after end date {end}"
                )));
            }
        }

        if let (Some(slug), Some(catalog)) = (self.agency.as_deref(), catalog) {
            catalog
                .check(slug)
                .map_err(|e| TrendError::InvalidQuery(e.to_string()))?;
        }

        Ok(())
    }
}
