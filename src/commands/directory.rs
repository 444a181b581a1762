use anyhow::{Context, Result};
use std::path::PathBuf;

use cfrscope::client::EcfrClient;
use cfrscope::config::Config;
use cfrscope::models::Agency;
use cfrscope::stats::{
    extract_slugs, flatten_agencies, load_agency_directory, summarize_agency_totals, SlugCatalog,
    TitleStats,
};

/// Where to read the agency directory from
pub enum DirectorySource {
    File(PathBuf),
    Remote,
}

impl DirectorySource {
    pub fn from_args(input: Option<PathBuf>, remote: bool) -> Result<Self> {
        match (input, remote) {
            (Some(path), _) => Ok(Self::File(path)),
            (None, true) => Ok(Self::Remote),
            (None, false) => anyhow::bail!("Specify --input <agencies.json> or --remote"),
        }
    }

    async fn load(self, config: &Config) -> Result<Vec<Agency>> {
        match self {
            Self::File(path) => load_agency_directory(&path).with_context(|| {
                format!("Failed to load agency directory from {}", path.display())
            }),
            Self::Remote => {
                let client =
                    EcfrClient::new(&config.api).context("Failed to create eCFR client")?;
                tracing::info!(base_url = %client.base_url(), "Fetching agency directory");
                client
                    .agencies()
                    .await
                    .context("Failed to fetch agency directory")
            }
        }
    }
}

pub async fn slugs(config: &Config, source: DirectorySource, output: Option<PathBuf>) -> Result<()> {
    let agencies = source.load(config).await?;
    let catalog = SlugCatalog::from_slugs(extract_slugs(&agencies));

    let output = output.unwrap_or_else(|| config.data.agency_slugs_path.clone());
    catalog
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(slugs = catalog.len(), path = %output.display(), "Saved agency slugs");
    println!("Saved {} agency slugs to {}", catalog.len(), output.display());

    Ok(())
}

pub async fn summarize(
    config: &Config,
    title_stats: Option<PathBuf>,
    source: DirectorySource,
    output: Option<PathBuf>,
) -> Result<()> {
    let title_stats_path = title_stats.unwrap_or_else(|| config.data.title_stats_path.clone());
    let stats = TitleStats::load(&title_stats_path).with_context(|| {
        format!(
            "Failed to load title statistics from {}",
            title_stats_path.display()
        )
    })?;

    let agencies = source.load(config).await?;
    let (references, children) = flatten_agencies(&agencies);
    let summary = summarize_agency_totals(&references, &children, &stats);

    let output = output.unwrap_or_else(|| config.data.agency_summary_path.clone());
    summary
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Summarized {} agencies ({} parents) into {}",
        summary.len(),
        children.len(),
        output.display()
    );

    Ok(())
}
