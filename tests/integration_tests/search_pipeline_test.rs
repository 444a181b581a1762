//! End-to-end trend search tests
//!
//! Runs the full listing → dedup → sequential count → rate pipeline against a
//! mock eCFR server.

use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfrscope::trends::{DateCount, SearchPhase, SearchQuery};

use super::fixtures::{
    count_body, daily_counts_body, date, search_against, CANDIDATE_DATES, COUNT_PATH,
    DAILY_COUNTS_PATH, PLANNED_COUNTS, PLANNED_DATES,
};

async fn mount_search(server: &MockServer, count_delay: Duration) {
    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .and(query_param("query", "small business"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(CANDIDATE_DATES)))
        .expect(1)
        .mount(server)
        .await;

    for (day, total) in PLANNED_DATES.iter().zip(PLANNED_COUNTS) {
        Mock::given(method("GET"))
            .and(path(COUNT_PATH))
            .and(query_param("date", *day))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(count_body(*total))
                    .set_delay(count_delay),
            )
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_search_pipeline() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, Duration::ZERO).await;

    let mut search = search_against(&mock_server, Duration::from_millis(10));
    let report = search
        .run(SearchQuery::new("small business"))
        .await
        .unwrap();

    assert_eq!(report.candidates, 6);
    assert_eq!(report.planned, 4);
    assert!(!report.cancelled);
    assert!(report.dropped.is_empty());
    assert!(!report.is_degraded());

    let expected: Vec<DateCount> = PLANNED_DATES
        .iter()
        .zip(PLANNED_COUNTS)
        .map(|(d, c)| DateCount::new(date(d), *c))
        .collect();
    assert_eq!(report.series, expected);

    // Jan → Feb 2020: +2 over one month; Mar → Jun 2025: +15 over three
    assert_eq!(report.rates.before_cutoff, Some(2.0));
    assert_eq!(report.rates.after_cutoff, Some(5.0));

    assert_eq!(search.phase(), SearchPhase::Idle);
    assert_eq!(search.progress().current, 4);
    assert_eq!(search.results().len(), 4);
}

#[tokio::test]
async fn test_requests_are_sequential_and_throttled() {
    let mock_server = MockServer::start().await;
    let response_delay = Duration::from_millis(20);
    let delay = Duration::from_millis(50);
    mount_search(&mock_server, response_delay).await;

    let mut search = search_against(&mock_server, delay);

    let started = Instant::now();
    let report = search
        .run(SearchQuery::new("small business"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.series.len(), 4);

    // Each request completes before its pause, so neither overlaps
    let minimum = (delay + response_delay) * 4;
    assert!(
        elapsed >= minimum,
        "elapsed {elapsed:?} shorter than sequential minimum {minimum:?}"
    );

    let requests = mock_server.received_requests().await.unwrap();
    let count_dates: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == COUNT_PATH)
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "date")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(count_dates, PLANNED_DATES);
}

#[tokio::test]
async fn test_agency_filter_and_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(CANDIDATE_DATES)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .and(query_param("agency_slugs[]", "small-business-administration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(7)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let query = SearchQuery::new("small business")
        .with_agency(Some("small-business-administration".to_string()))
        .with_range(Some(date("2020-01-10")), Some(date("2025-04-01")));

    let report = search.run(query).await.unwrap();

    let dates: Vec<_> = report.series.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![date("2020-01-20"), date("2020-02-10"), date("2025-03-01")]
    );
    assert_eq!(report.rates.before_cutoff, Some(0.0));
    assert_eq!(report.rates.after_cutoff, Some(0.0));
}

#[tokio::test]
async fn test_cancel_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    mount_search_without_expectations(&mock_server).await;

    // Long enough that only cancellation can end the run in time
    let mut search = search_against(&mock_server, Duration::from_secs(30));
    let cancel = search.cancel_handle();
    let mut status = search.subscribe();

    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            if status.borrow_and_update().progress.current >= 1 {
                cancel.cancel();
                break;
            }
        }
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        search.run(SearchQuery::new("small business")),
    )
    .await
    .expect("cancelled search should finish promptly")
    .unwrap();

    assert!(report.cancelled);
    assert!(report.is_degraded());
    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].date, date("2020-01-05"));
    assert_eq!(search.phase(), SearchPhase::Idle);
}

#[tokio::test]
async fn test_new_search_discards_previous_state() {
    let mock_server = MockServer::start().await;
    mount_search_without_expectations(&mock_server).await;

    let mut search = search_against(&mock_server, Duration::from_millis(1));
    let first = search
        .run(SearchQuery::new("small business"))
        .await
        .unwrap();
    let second = search
        .run(SearchQuery::new("small business"))
        .await
        .unwrap();

    assert_eq!(first.series, second.series);
    assert_eq!(search.results().len(), 4);
}

async fn mount_search_without_expectations(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DAILY_COUNTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_counts_body(CANDIDATE_DATES)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(COUNT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(5)))
        .mount(server)
        .await;
}
