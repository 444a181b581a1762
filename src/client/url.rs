//! URL construction for eCFR endpoints and ecfr.gov pages

use chrono::NaiveDate;
use url::Url;

use crate::utils::error::FetchError;

/// Path of the per-day match listing endpoint
pub const DAILY_COUNTS_PATH: &str = "/api/search/v1/counts/daily";

/// Path of the exact-count endpoint
pub const COUNT_PATH: &str = "/api/search/v1/count";

/// Path of the agency directory endpoint
pub const AGENCIES_PATH: &str = "/api/admin/v1/agencies.json";

/// Query parameter name used for the repeated agency filter
pub const AGENCY_FILTER_PARAM: &str = "agency_slugs[]";

fn endpoint(base: &str, path: &str) -> Result<Url, FetchError> {
    let raw = format!("{}{path}", base.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}

/// Build the daily-counts URL for a keyword
pub fn daily_counts_url(base: &str, keyword: &str) -> Result<Url, FetchError> {
    let mut url = endpoint(base, DAILY_COUNTS_PATH)?;
    url.query_pairs_mut().append_pair("query", keyword);
    Ok(url)
}

/// Build the exact-count URL for a keyword on one date
pub fn count_url(
    base: &str,
    keyword: &str,
    date: NaiveDate,
    agency: Option<&str>,
) -> Result<Url, FetchError> {
    let mut url = endpoint(base, COUNT_PATH)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("query", keyword)
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        if let Some(slug) = agency {
            pairs.append_pair(AGENCY_FILTER_PARAM, slug);
        }
    }
    Ok(url)
}

/// Build the agency directory URL
pub fn agencies_url(base: &str) -> Result<Url, FetchError> {
    endpoint(base, AGENCIES_PATH)
}

/// Link to the ecfr.gov search page showing current mentions of a keyword
pub fn search_page_url(base: &str, keyword: &str, agency: Option<&str>) -> Result<Url, FetchError> {
    let mut url = endpoint(base, "/search")?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("search[date]", "current")
            .append_pair("search[query]", keyword);
        if let Some(slug) = agency {
            pairs.append_pair("search[agency_slugs][]", slug);
        }
        pairs.append_pair("view", "standard");
    }
    Ok(url)
}
