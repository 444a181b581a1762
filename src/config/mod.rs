//! Configuration management for cfrscope
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default public eCFR host
pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// eCFR API configuration
    pub api: ApiConfig,

    /// Keyword trend search configuration
    pub trend: TrendConfig,

    /// Static data file locations
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// eCFR API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the eCFR service, without a trailing slash
    pub base_url: String,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Keyword trend search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Pause after every exact-count request, in milliseconds
    pub delay_ms: u64,

    /// Dates before this are never queried
    pub earliest_date: NaiveDate,

    /// Series are split into before/after partitions at this date
    pub cutoff_date: NaiveDate,

    /// Human readable name of the cutoff event
    pub cutoff_label: String,
}

/// Locations of the precomputed statistics files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Per-title word and section counts
    pub title_stats_path: PathBuf,

    /// Per-agency totals with children and references
    pub agency_summary_path: PathBuf,

    /// Known agency slugs for validating search filters
    pub agency_slugs_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn default_user_agent() -> String {
    format!("cfrscope/{}", env!("CARGO_PKG_VERSION"))
}

fn default_earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default()
}

fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap_or_default()
}

fn env_date(key: &str) -> Option<NaiveDate> {
    std::env::var(key)
        .ok()
        .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("CFRSCOPE_BASE_URL")
            .unwrap_or(defaults.api.base_url)
            .trim_end_matches('/')
            .to_string();

        let user_agent = std::env::var("CFRSCOPE_USER_AGENT").unwrap_or(defaults.api.user_agent);

        let request_timeout_secs = std::env::var("CFRSCOPE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.api.request_timeout_secs);

        let delay_ms = std::env::var("CFRSCOPE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.trend.delay_ms);

        let earliest_date =
            env_date("CFRSCOPE_EARLIEST_DATE").unwrap_or(defaults.trend.earliest_date);
        let cutoff_date = env_date("CFRSCOPE_CUTOFF_DATE").unwrap_or(defaults.trend.cutoff_date);

        let cutoff_label =
            std::env::var("CFRSCOPE_CUTOFF_LABEL").unwrap_or(defaults.trend.cutoff_label);

        let data_dir = std::env::var("CFRSCOPE_DATA_DIR").map(PathBuf::from).ok();
        let data = match data_dir {
            Some(dir) => DataConfig::in_dir(&dir),
            None => defaults.data,
        };

        let log_level = std::env::var("CFRSCOPE_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let log_format = std::env::var("CFRSCOPE_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            api: ApiConfig {
                base_url,
                user_agent,
                request_timeout_secs,
            },
            trend: TrendConfig {
                delay_ms,
                earliest_date,
                cutoff_date,
                cutoff_label,
            },
            data,
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.trend.earliest_date > self.trend.cutoff_date {
            anyhow::bail!(
                "earliest_date ({}) must not be after cutoff_date ({})",
                self.trend.earliest_date,
                self.trend.cutoff_date
            );
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.api.request_timeout()
    }

    /// Get the inter-request delay as Duration
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.trend.delay_ms)
    }
}

impl ApiConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DataConfig {
    /// Standard file names rooted at `dir`
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            title_stats_path: dir.join("title_stats.json"),
            agency_summary_path: dir.join("agency_summary.json"),
            agency_slugs_path: dir.join("agency_slugs.json"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: String::from(DEFAULT_BASE_URL),
                user_agent: default_user_agent(),
                request_timeout_secs: 30,
            },
            trend: TrendConfig {
                delay_ms: 500,
                earliest_date: default_earliest_date(),
                cutoff_date: default_cutoff_date(),
                cutoff_label: String::from("DOGE founded"),
            },
            data: DataConfig::in_dir(Path::new("data")),
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
