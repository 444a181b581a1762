use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use cfrscope::client::{url::search_page_url, EcfrClient};
use cfrscope::config::Config;
use cfrscope::stats::SlugCatalog;
use cfrscope::trends::{SearchPhase, SearchQuery, SearchReport, SearchSettings, TrendSearch};
use cfrscope::utils::format_thousands;

pub struct TrendParams {
    pub keyword: String,
    pub agency: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub delay_ms: Option<u64>,
    pub format: String,
}

#[derive(Serialize)]
struct TrendOutput<'a> {
    #[serde(flatten)]
    report: &'a SearchReport,
    cutoff_label: &'a str,
    search_url: Option<String>,
}

pub async fn trend(config: &Config, params: TrendParams) -> Result<()> {
    let client = EcfrClient::new(&config.api).context("Failed to create eCFR client")?;

    let mut settings = SearchSettings::from(&config.trend);
    if let Some(delay_ms) = params.delay_ms {
        settings.delay = Duration::from_millis(delay_ms);
    }

    let mut search = TrendSearch::new(client, settings);

    if params.agency.is_some() {
        let path = &config.data.agency_slugs_path;
        match SlugCatalog::load(path) {
            Ok(catalog) => search = search.with_slug_catalog(catalog),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Slug catalog unavailable, agency filter will not be checked"
            ),
        }
    }

    let query = SearchQuery::new(params.keyword)
        .with_agency(params.agency)
        .with_range(params.start, params.end);

    let cancel = search.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current request");
            cancel.cancel();
        }
    });

    let json = params.format == "json";
    let mut status_rx = search.subscribe();
    let progress = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = *status_rx.borrow_and_update();
            if json {
                continue;
            }
            match status.phase {
                SearchPhase::Collecting => eprintln!("Listing candidate dates..."),
                SearchPhase::Throttling => {
                    eprint!(
                        "\rFetching exact counts: {}/{} ({:.0}%)",
                        status.progress.current,
                        status.progress.total,
                        status.progress.fraction() * 100.0
                    );
                    let _ = std::io::stderr().flush();
                }
                SearchPhase::Summarizing => eprintln!(),
                SearchPhase::Idle => {}
            }
        }
    });

    let outcome = search.run(query).await;

    progress.abort();
    interrupt.abort();

    let report = outcome.context("Trend search failed")?;

    let search_url = search_page_url(
        &config.api.base_url,
        &report.query.keyword,
        report.query.agency.as_deref(),
    )
    .map(|url| url.to_string())
    .map_err(|e| tracing::warn!(error = %e, "Could not build search page link"))
    .ok();

    if json {
        let output = TrendOutput {
            report: &report,
            cutoff_label: &config.trend.cutoff_label,
            search_url,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, &config.trend.cutoff_label, search_url.as_deref());
    }

    Ok(())
}

fn print_report(report: &SearchReport, cutoff_label: &str, search_url: Option<&str>) {
    println!("Keyword trend: \"{}\"", report.query.keyword);
    println!("================================");
    println!(
        "  Agency: {}",
        report.query.agency.as_deref().unwrap_or("all agencies")
    );
    println!(
        "  Dates: {} candidates, {} queried (one per month)",
        report.candidates, report.planned
    );

    if report.series.is_empty() {
        println!("\nNo counts were collected.");
    } else {
        println!("\n  {:<12} {:>10}", "Date", "Matches");
        for point in &report.series {
            let marker = if point.date >= report.cutoff { " *" } else { "" };
            println!(
                "  {:<12} {:>10}{marker}",
                point.date.to_string(),
                format_thousands(point.count)
            );
        }
        println!("  (* on or after {cutoff_label}, {})", report.cutoff);
    }

    println!();
    println!(
        "Monthly growth before {cutoff_label}: {}",
        format_rate(report.rates.before_cutoff)
    );
    println!(
        "Monthly growth after {cutoff_label}:  {}",
        format_rate(report.rates.after_cutoff)
    );

    if report.cancelled {
        println!("\nSearch was cancelled; results are partial.");
    }

    if !report.dropped.is_empty() {
        println!(
            "\nDropped {} of {} dates ({:.0}% coverage):",
            report.dropped.len(),
            report.planned,
            report.coverage() * 100.0
        );
        for dropped in &report.dropped {
            println!("  {}: {}", dropped.date, dropped.reason);
        }
    }

    if let Some(url) = search_url {
        println!("\nView current mentions: {url}");
    }
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:+.2} mentions/month"),
        None => "n/a".to_string(),
    }
}
