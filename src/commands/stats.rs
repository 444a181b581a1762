use anyhow::{Context, Result};
use std::path::PathBuf;

use cfrscope::config::Config;
use cfrscope::stats::{
    page_count, paginate, sort_rows, AgencySummary, SortKey, SortOrder, TitleStats,
};
use cfrscope::utils::{format_thousands, truncate_text};

const NAME_WIDTH: usize = 48;

pub fn titles(config: &Config, input: Option<PathBuf>, top: Option<usize>) -> Result<()> {
    let path = input.unwrap_or_else(|| config.data.title_stats_path.clone());
    let stats = TitleStats::load(&path)
        .with_context(|| format!("Failed to load title statistics from {}", path.display()))?;

    let grand = stats.grand_total();
    let mut rows = stats.title_totals();

    if let Some(top) = top {
        rows.sort_by(|a, b| b.totals.words.cmp(&a.totals.words));
        rows.truncate(top);
    }

    println!("CFR titles ({} total)", stats.len());
    println!("================================");
    println!(
        "  {:<12} {:>14} {:>10} {:>8}",
        "Title", "Words", "Sections", "Share"
    );

    for row in &rows {
        let share = if grand.words == 0 {
            0.0
        } else {
            row.totals.words as f64 / grand.words as f64 * 100.0
        };
        println!(
            "  {:<12} {:>14} {:>10} {:>7.1}%",
            row.title,
            format_thousands(row.totals.words),
            format_thousands(row.totals.sections),
            share
        );
    }

    println!();
    println!("  Total words:    {}", format_thousands(grand.words));
    println!("  Total sections: {}", format_thousands(grand.sections));

    Ok(())
}

pub struct AgencyTableParams {
    pub input: Option<PathBuf>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub page: usize,
    pub per_page: usize,
    pub expand: bool,
}

pub fn agencies(config: &Config, params: AgencyTableParams) -> Result<()> {
    let path = load_path(config, params.input);
    let summary = AgencySummary::load(&path)
        .with_context(|| format!("Failed to load agency summary from {}", path.display()))?;

    let mut rows = summary.rows();
    sort_rows(&mut rows, params.sort, params.order);

    let pages = page_count(rows.len(), params.per_page);
    // Pages are 1-based on the command line
    let page = params.page.max(1);
    let visible = paginate(&rows, page - 1, params.per_page);

    println!(
        "Agencies by {} ({}), page {page} of {pages}",
        params.sort, params.order
    );
    println!("================================");
    println!(
        "  {:<NAME_WIDTH$} {:>14} {:>10}",
        "Agency", "Words", "Sections"
    );

    for row in visible {
        let marker = if row.is_expandable() { "+" } else { " " };
        println!(
            "{marker} {:<NAME_WIDTH$} {:>14} {:>10}",
            truncate_text(&row.agency, NAME_WIDTH),
            format_thousands(row.words),
            format_thousands(row.sections)
        );

        if params.expand {
            for child in &row.children {
                println!(
                    "    - {:<width$} {:>14} {:>10}",
                    truncate_text(&child.agency, NAME_WIDTH - 4),
                    format_thousands(child.words),
                    format_thousands(child.sections),
                    width = NAME_WIDTH - 4
                );
            }
        }
    }

    if visible.is_empty() {
        println!("  (no agencies on this page)");
    }

    Ok(())
}

pub fn references(config: &Config, agency: &str, input: Option<PathBuf>) -> Result<()> {
    let path = load_path(config, input);
    let summary = AgencySummary::load(&path)
        .with_context(|| format!("Failed to load agency summary from {}", path.display()))?;

    let (name, record) = summary.find(agency)?;

    println!("CFR references for {name}");
    println!("================================");

    if record.references.is_empty() {
        println!("  No direct references.");
    }

    for reference in &record.references {
        println!("  {reference}");
        println!("    {}", reference.ecfr_url(&config.api.base_url));
    }

    if !record.children.is_empty() {
        println!("\n  Sub-agencies:");
        for child in &record.children {
            println!("    - {}", child.agency);
        }
    }

    Ok(())
}

fn load_path(config: &Config, input: Option<PathBuf>) -> PathBuf {
    input.unwrap_or_else(|| config.data.agency_summary_path.clone())
}
