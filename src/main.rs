use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cfrscope::config::Config;
use cfrscope::stats::{SortKey, SortOrder};

mod commands;

use commands::{AgencyTableParams, DirectorySource, TrendParams};

#[derive(Parser)]
#[command(
    name = "cfrscope",
    version,
    about = "eCFR keyword trends and regulation statistics",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML config file; environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Track monthly mentions of a keyword and compare growth around the cutoff
    Trend {
        /// Keyword or "quoted phrase"
        keyword: String,

        /// Restrict counts to one agency slug
        #[arg(short, long)]
        agency: Option<String>,

        /// Earliest date to query (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Latest date to query (YYYY-MM-DD); capped at today
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Pause after each count request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Word and section totals per CFR title
    Titles {
        /// title_stats.json to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show only the N largest titles
        #[arg(long)]
        top: Option<usize>,
    },

    /// Paginated agency table
    Agencies {
        /// agency_summary.json to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Sort column (agency, words, sections)
        #[arg(short, long, default_value = "words")]
        sort: SortKey,

        /// Sort order (asc, desc)
        #[arg(short, long, default_value = "desc")]
        order: SortOrder,

        /// Page to show, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value = "25")]
        per_page: usize,

        /// List sub-agencies under their parent
        #[arg(short, long, default_value = "false")]
        expand: bool,
    },

    /// CFR references owned by an agency, with ecfr.gov links
    References {
        /// Agency name as it appears in the summary
        agency: String,

        /// agency_summary.json to read
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Extract agency slugs from the agency directory
    Slugs {
        /// Saved agencies.json to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Fetch the directory from the eCFR admin API
        #[arg(long, conflicts_with = "input")]
        remote: bool,

        /// Where to write agency_slugs.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build agency_summary.json from title statistics and the agency directory
    Summarize {
        /// title_stats.json to read
        #[arg(long)]
        title_stats: Option<PathBuf>,

        /// Saved agencies.json to read
        #[arg(short, long)]
        agencies: Option<PathBuf>,

        /// Fetch the directory from the eCFR admin API
        #[arg(long, conflicts_with = "agencies")]
        remote: bool,

        /// Where to write agency_summary.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!(base_url = %config.api.base_url, "cfrscope starting");

    match cli.command {
        Commands::Trend {
            keyword,
            agency,
            start,
            end,
            delay_ms,
            format,
        } => {
            tracing::info!(
                keyword = %keyword,
                agency = ?agency,
                start = ?start,
                end = ?end,
                "Starting trend command"
            );
            commands::trend(
                &config,
                TrendParams {
                    keyword,
                    agency,
                    start,
                    end,
                    delay_ms,
                    format,
                },
            )
            .await?;
        }

        Commands::Titles { input, top } => {
            commands::titles(&config, input, top)?;
        }

        Commands::Agencies {
            input,
            sort,
            order,
            page,
            per_page,
            expand,
        } => {
            commands::agencies(
                &config,
                AgencyTableParams {
                    input,
                    sort,
                    order,
                    page,
                    per_page,
                    expand,
                },
            )?;
        }

        Commands::References { agency, input } => {
            commands::references(&config, &agency, input)?;
        }

        Commands::Slugs {
            input,
            remote,
            output,
        } => {
            let source = DirectorySource::from_args(input, remote)?;
            commands::slugs(&config, source, output).await?;
        }

        Commands::Summarize {
            title_stats,
            agencies,
            remote,
            output,
        } => {
            tracing::info!(
                title_stats = ?title_stats,
                agencies = ?agencies,
                remote,
                "Starting summarize command"
            );
            let source = DirectorySource::from_args(agencies, remote)?;
            commands::summarize(&config, title_stats, source, output).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("cfrscope=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("cfrscope={level},warn"))?
    };

    // Logs go to stderr so report output on stdout stays machine readable
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
