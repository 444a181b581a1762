//! eCFR HTTP client
//!
//! Typed access to the public eCFR endpoints used by cfrscope:
//! - daily match listing (`/api/search/v1/counts/daily`)
//! - exact counts per date (`/api/search/v1/count`)
//! - the agency directory (`/api/admin/v1/agencies.json`)
//!
//! Search endpoints are exposed through the [`SearchApi`] trait so the trend
//! fetcher can be driven by any implementation.

pub mod url;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::Agency;
use crate::utils::error::FetchError;

/// Search operations the trend fetcher depends on
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Dates on which the keyword has any matches, sorted ascending
    async fn daily_counts(&self, keyword: &str) -> Result<Vec<NaiveDate>, FetchError>;

    /// Exact number of matching regulations on `date`
    async fn count(
        &self,
        keyword: &str,
        date: NaiveDate,
        agency: Option<&str>,
    ) -> Result<u64, FetchError>;
}

#[derive(Debug, Deserialize)]
struct DailyCountsResponse {
    #[serde(default)]
    dates: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default)]
    meta: Option<CountMeta>,
}

#[derive(Debug, Deserialize)]
struct CountMeta {
    #[serde(default)]
    total_count: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AgenciesResponse {
    #[serde(default)]
    agencies: Vec<Agency>,
}

/// Client for the public eCFR API
#[derive(Debug, Clone)]
pub struct EcfrClient {
    client: Client,
    base_url: String,
}

impl EcfrClient {
    /// Create a client from API configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Self::with_settings(&config.base_url, &config.user_agent, config.request_timeout())
    }

    /// Create a client against a custom base URL, e.g. a mock server
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::with_settings(
            base_url,
            concat!("cfrscope/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(30),
        )
    }

    /// Create a client with every knob specified
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_settings(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full agency directory
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` on transport failure, non-success status or malformed JSON
    pub async fn agencies(&self) -> Result<Vec<Agency>, FetchError> {
        let url = url::agencies_url(&self.base_url)?;
        let response: AgenciesResponse = self.get_json(url).await?;

        tracing::debug!(agencies = response.agencies.len(), "Fetched agency directory");

        Ok(response.agencies)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: ::url::Url) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchApi for EcfrClient {
    async fn daily_counts(&self, keyword: &str) -> Result<Vec<NaiveDate>, FetchError> {
        let url = url::daily_counts_url(&self.base_url, keyword)?;
        let response: DailyCountsResponse = self.get_json(url).await?;

        let mut dates: Vec<NaiveDate> = response
            .dates
            .unwrap_or_default()
            .into_keys()
            .filter_map(|key| match NaiveDate::parse_from_str(&key, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::debug!(key = %key, "Skipping non-date key in daily counts");
                    None
                }
            })
            .collect();
        dates.sort_unstable();

        Ok(dates)
    }

    async fn count(
        &self,
        keyword: &str,
        date: NaiveDate,
        agency: Option<&str>,
    ) -> Result<u64, FetchError> {
        let url = url::count_url(&self.base_url, keyword, date, agency)?;
        let response: CountResponse = self.get_json(url).await?;

        response
            .meta
            .and_then(|meta| meta.total_count)
            .and_then(|total| total.as_u64())
            .ok_or(FetchError::MissingField("meta.total_count"))
    }
}
