//! Common test utilities

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DAILY_COUNTS_PATH: &str = "/api/search/v1/counts/daily";
pub const COUNT_PATH: &str = "/api/search/v1/count";
pub const AGENCIES_PATH: &str = "/api/admin/v1/agencies.json";

/// Body of a daily counts response listing `dates`
#[allow(dead_code)]
pub fn daily_counts_body(dates: &[&str]) -> Value {
    let map: serde_json::Map<String, Value> = dates
        .iter()
        .map(|date| ((*date).to_string(), json!(1)))
        .collect();
    json!({ "dates": map })
}

/// Body of an exact count response
#[allow(dead_code)]
pub fn count_body(total: u64) -> Value {
    json!({ "meta": { "total_count": total } })
}

/// Mount the daily listing endpoint for any keyword
#[allow(dead_code)]
pub async fn mount_daily_counts(server: &MockServer, dates: &[&str]) {
    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(dates)))
        .mount(server)
        .await;
}

/// Mount an exact count for one date
#[allow(dead_code)]
pub async fn mount_count(server: &MockServer, date: &str, total: u64) {
    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .and(query_param("date", date))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(total)))
        .mount(server)
        .await;
}

/// A small agency directory in the admin API shape
#[allow(dead_code)]
pub fn agencies_body() -> Value {
    json!({
        "agencies": [
            {
                "name": "Department of Agriculture",
                "short_name": "USDA",
                "slug": "agriculture-department",
                "cfr_references": [{"title": 7, "subtitle": "B"}],
                "children": [
                    {
                        "name": "Forest Service",
                        "slug": "forest-service",
                        "cfr_references": [{"title": 36, "chapter": "II"}]
                    }
                ]
            },
            {
                "name": "Administrative Conference of the United States",
                "slug": "administrative-conference-of-the-united-states",
                "cfr_references": [{"title": 1, "chapter": "III"}]
            }
        ]
    })
}

/// Title statistics matching [`agencies_body`]
#[allow(dead_code)]
pub fn title_stats_body() -> Value {
    json!({
        "Title 1": {"Chapter III": {"word_count": 1200, "section_count": 12}},
        "Title 7": {
            "Subtitle A": {"Chapter I": {"word_count": 5000, "section_count": 50}},
            "Subtitle B": {
                "Chapter XVII": {"word_count": 3000, "section_count": 30},
                "Chapter XVIII": {"word_count": 2000, "section_count": 20}
            }
        },
        "Title 36": {"Chapter II": {"word_count": 800, "section_count": 8}}
    })
}
