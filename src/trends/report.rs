//! Search progress and outcome types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::SearchQuery;
use super::series::{DateCount, RateResult};

/// Lifecycle of one search on a [`TrendSearch`](super::TrendSearch)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchPhase {
    /// No search running
    #[default]
    Idle,

    /// Waiting on the candidate-date listing
    Collecting,

    /// Sequential exact-count loop
    Throttling,

    /// Splitting the series and computing rates
    Summarizing,
}

/// How many exact-count requests have completed out of the planned total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// Completed fraction in `[0.0, 1.0]`; an empty plan counts as done
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Snapshot published to subscribers while a search runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatus {
    pub phase: SearchPhase,
    pub progress: Progress,
}

/// A date whose exact count could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedDate {
    pub date: NaiveDate,
    pub reason: String,
}

/// Everything one search produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Query that produced this report
    pub query: SearchQuery,

    /// Exact counts, ascending by date
    pub series: Vec<DateCount>,

    /// Monthly rates either side of `cutoff`
    pub rates: RateResult,

    /// Date the series was split at
    pub cutoff: NaiveDate,

    /// Dates skipped because their count request failed
    pub dropped: Vec<DroppedDate>,

    /// Number of distinct dates returned by the listing call
    pub candidates: usize,

    /// Number of dates left after filtering and monthly deduplication
    pub planned: usize,

    /// Whether the loop stopped early on request
    pub cancelled: bool,
}

impl SearchReport {
    /// Whether some planned dates are missing from the series
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.dropped.is_empty() || self.cancelled
    }

    /// Share of planned dates that produced a count
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.planned == 0 {
            1.0
        } else {
            self.series.len() as f64 / self.planned as f64
        }
    }
}
