//! Error scenario integration tests
//!
//! Tests various failure modes and error handling:
//! 1. Listing failures (HTTP errors, malformed JSON)
//! 2. Per-date failures that degrade but do not abort a search
//! 3. Request timeouts
//! 4. Queries rejected before any request is sent

use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfrscope::client::EcfrClient;
use cfrscope::stats::SlugCatalog;
use cfrscope::trends::{SearchPhase, SearchQuery, TrendError, TrendSearch};
use cfrscope::utils::error::FetchError;

use super::fixtures::{
    count_body, daily_counts_body, date, search_against, settings, CANDIDATE_DATES, COUNT_PATH,
    DAILY_COUNTS_PATH,
};

// ============================================================================
// Listing Failures
// ============================================================================

#[tokio::test]
async fn test_listing_server_error_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    // No exact count may be attempted after a failed listing
    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let result = search.run(SearchQuery::new("tariff")).await;

    match result {
        Err(TrendError::Listing { keyword, source }) => {
            assert_eq!(keyword, "tariff");
            assert!(matches!(source, FetchError::ServerError(500)));
        }
        other => panic!("Expected listing error, got {other:?}"),
    }

    assert_eq!(search.phase(), SearchPhase::Idle);
    assert!(search.results().is_empty());
}

#[tokio::test]
async fn test_listing_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"dates\": [unterminated"))
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let err = search
        .run(SearchQuery::new("tariff"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TrendError::Listing {
            source: FetchError::Decode(_),
            ..
        }
    ));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_empty_listing_gives_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(&[])))
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let report = search.run(SearchQuery::new("zyzzyva")).await.unwrap();

    assert!(report.series.is_empty());
    assert_eq!(report.planned, 0);
    assert_eq!(report.rates.before_cutoff, Some(0.0));
    assert_eq!(report.rates.after_cutoff, Some(0.0));
}

// ============================================================================
// Per-date Failures
// ============================================================================

#[tokio::test]
async fn test_failed_date_is_dropped_not_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(CANDIDATE_DATES)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .and(query_param("date", "2020-02-10"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(1) // No retry
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(9)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let report = search.run(SearchQuery::new("tariff")).await.unwrap();

    assert_eq!(report.series.len(), 3);
    assert!(report.series.iter().all(|p| p.date != date("2020-02-10")));

    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].date, date("2020-02-10"));
    assert!(report.dropped[0].reason.contains("500"));

    assert!(report.is_degraded());
    assert!((report.coverage() - 0.75).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_missing_total_count_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(daily_counts_body(&["2021-05-05"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"meta": null})))
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let report = search.run(SearchQuery::new("tariff")).await.unwrap();

    assert!(report.series.is_empty());
    assert_eq!(report.dropped.len(), 1);
    assert!(report.dropped[0].reason.contains("total_count"));
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test]
async fn test_count_timeout_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(daily_counts_body(&["2021-05-05", "2021-06-06"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .and(query_param("date", "2021-05-05"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(count_body(4))
                .set_delay(Duration::from_secs(5)), // Longer than timeout
        )
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(6)))
        .mount(&mock_server)
        .await;

    let client = EcfrClient::with_settings(
        &mock_server.uri(),
        "cfrscope-test",
        Duration::from_millis(200),
    )
    .unwrap();
    let mut search = TrendSearch::new(client, settings(Duration::from_millis(1)));
    let report = search.run(SearchQuery::new("tariff")).await.unwrap();

    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].date, date("2021-06-06"));
    assert_eq!(report.dropped[0].date, date("2021-05-05"));
    assert_eq!(report.dropped[0].reason, FetchError::Timeout.to_string());
}

// ============================================================================
// Rejected Queries
// ============================================================================

#[tokio::test]
async fn test_invalid_queries_send_no_requests() {
    let mock_server = MockServer::start().await;

    let catalog = SlugCatalog::from_slugs(vec!["forest-service".to_string()]);
    let client = EcfrClient::with_base_url(&mock_server.uri()).unwrap();
    let mut search = TrendSearch::new(client, settings(Duration::from_millis(1)))
        .with_slug_catalog(catalog);

    let blank = search.run(SearchQuery::new("   ")).await;
    assert!(matches!(blank, Err(TrendError::InvalidQuery(_))));

    let unknown_agency = search
        .run(SearchQuery::new("tariff").with_agency(Some("ministry-of-magic".to_string())))
        .await;
    assert!(matches!(unknown_agency, Err(TrendError::InvalidQuery(_))));

    let inverted = search
        .run(SearchQuery::new("tariff").with_range(Some(date("2024-01-01")), Some(date("2020-01-01"))))
        .await;
    assert!(matches!(inverted, Err(TrendError::InvalidQuery(_))));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
