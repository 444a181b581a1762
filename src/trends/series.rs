//! Month-level time series helpers
//!
//! Pure functions over dates and [`DateCount`] points:
//! - downsampling candidate dates to one per calendar month
//! - splitting a series at a cutoff date
//! - first/last linear rate per month

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Exact match count observed on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateCount {
    /// Date the count was taken for
    pub date: NaiveDate,

    /// Number of regulations matching on that date
    pub count: u64,
}

impl DateCount {
    /// Create a new data point
    #[must_use]
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

/// Monthly rates on either side of the cutoff date
///
/// Both sides are `None` until a search has been summarized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateResult {
    pub before_cutoff: Option<f64>,
    pub after_cutoff: Option<f64>,
}

impl RateResult {
    /// Sort `series`, split it at `cutoff` and rate each side
    #[must_use]
    pub fn from_series(series: &[DateCount], cutoff: NaiveDate) -> Self {
        let mut sorted = series.to_vec();
        sorted.sort_by_key(|point| point.date);

        let (before, after) = split_by_cutoff(&sorted, cutoff);

        Self {
            before_cutoff: Some(compute_rate(&before)),
            after_cutoff: Some(compute_rate(&after)),
        }
    }
}

/// Keep dates inside the allowed window, sorted, one per calendar month
///
/// Bounds are inclusive. Within a month the earliest date wins.
#[must_use]
pub fn filter_and_deduplicate(
    dates: &[NaiveDate],
    earliest_allowed: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<NaiveDate> {
    let mut in_range: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|&d| d >= earliest_allowed)
        .filter(|&d| start.map_or(true, |s| d >= s))
        .filter(|&d| end.map_or(true, |e| d <= e))
        .collect();
    in_range.sort_unstable();

    let mut seen = HashSet::new();
    in_range
        .into_iter()
        .filter(|d| seen.insert((d.year(), d.month())))
        .collect()
}

/// Whole calendar months from `start` to `end`, ignoring the day of month
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// Change in count per month between the first and last point
///
/// `series` must be sorted ascending by date. Returns 0 for fewer than two
/// points or when both endpoints fall in the same month. The result is
/// rounded to two decimal places.
#[must_use]
pub fn compute_rate(series: &[DateCount]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    if series.len() < 2 {
        return 0.0;
    }

    let months = months_between(first.date, last.date);
    if months == 0 {
        return 0.0;
    }

    let delta = last.count as f64 - first.count as f64;
    round_to_cents(delta / f64::from(months))
}

/// Partition into points strictly before `cutoff` and points on or after it
#[must_use]
pub fn split_by_cutoff(
    series: &[DateCount],
    cutoff: NaiveDate,
) -> (Vec<DateCount>, Vec<DateCount>) {
    series.iter().partition(|point| point.date < cutoff)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
