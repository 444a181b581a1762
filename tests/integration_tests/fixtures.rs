//! Test fixtures for integration tests
//!
//! Provides mock eCFR responses and helpers for building searches

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

use cfrscope::client::EcfrClient;
use cfrscope::trends::{SearchSettings, TrendSearch};

pub const DAILY_COUNTS_PATH: &str = "/api/search/v1/counts/daily";
pub const COUNT_PATH: &str = "/api/search/v1/count";

/// Candidate dates as the listing returns them: unsorted, two in January 2020
pub const CANDIDATE_DATES: &[&str] = &[
    "2025-06-15",
    "2020-01-20",
    "2016-05-01",
    "2020-02-10",
    "2025-03-01",
    "2020-01-05",
];

/// Dates left after dropping pre-2017 dates and keeping one per month
pub const PLANNED_DATES: &[&str] = &["2020-01-05", "2020-02-10", "2025-03-01", "2025-06-15"];

/// Exact counts keyed to [`PLANNED_DATES`]
pub const PLANNED_COUNTS: &[u64] = &[10, 12, 40, 55];

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn daily_counts_body(dates: &[&str]) -> Value {
    let map: serde_json::Map<String, Value> = dates
        .iter()
        .map(|d| ((*d).to_string(), json!(3)))
        .collect();
    json!({ "dates": map })
}

pub fn count_body(total: u64) -> Value {
    json!({ "meta": { "total_count": total, "description": "regulations" } })
}

/// Settings with the usual dates and a short delay
pub fn settings(delay: Duration) -> SearchSettings {
    SearchSettings {
        delay,
        earliest_date: date("2017-01-01"),
        cutoff_date: date("2025-01-20"),
    }
}

/// A search pointed at `server`
pub fn search_against(server: &MockServer, delay: Duration) -> TrendSearch<EcfrClient> {
    let client = EcfrClient::with_base_url(&server.uri()).unwrap();
    TrendSearch::new(client, settings(delay))
}
