//! Keyword mention trends over time
//!
//! Turns a keyword (plus optional agency and date range) into a monthly
//! series of exact match counts from the eCFR search API, then compares the
//! monthly growth rate before and after a fixed cutoff date.

pub mod error;
pub mod query;
pub mod report;
pub mod search;
pub mod series;

pub use error::{TrendError, TrendResult};
pub use query::SearchQuery;
pub use report::{DroppedDate, Progress, SearchPhase, SearchReport, SearchStatus};
pub use search::{CancelHandle, SearchSettings, TrendSearch};
pub use series::{
    compute_rate, filter_and_deduplicate, months_between, split_by_cutoff, DateCount, RateResult,
};
