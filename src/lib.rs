//! cfrscope - eCFR keyword trends and regulation statistics
//!
//! Tracks how often a keyword appears in the Code of Federal Regulations over
//! time and compares its growth before and after a cutoff date, alongside
//! word and section totals per title and per agency.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`client`] - eCFR search and admin API client
//! - [`trends`] - Sequential, rate-limited keyword trend search
//! - [`stats`] - Title and agency statistics from precomputed files
//! - [`models`] - Agency directory data structures
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use cfrscope::client::EcfrClient;
//! use cfrscope::config::Config;
//! use cfrscope::trends::{SearchQuery, SearchSettings, TrendSearch};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = EcfrClient::new(&config.api)?;
//!     let mut search = TrendSearch::new(client, SearchSettings::from(&config.trend));
//!     let report = search.run(SearchQuery::new("tariff")).await?;
//!     println!("{:?}", report.rates);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod trends;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{EcfrClient, SearchApi};
    pub use crate::config::Config;
    pub use crate::error::{CfrErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{Agency, CfrReference};
    pub use crate::stats::{AgencySummary, SlugCatalog, TitleStats};
    pub use crate::trends::{DateCount, RateResult, SearchQuery, SearchReport, TrendSearch};
}

// Direct re-exports for convenience
pub use models::{Agency, CfrReference};
