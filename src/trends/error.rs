//! Error types for keyword trend searches

use thiserror::Error;

use crate::utils::error::FetchError;

/// Errors that abort a trend search
///
/// Per-date count failures never surface here; they are reported as
/// [`DroppedDate`](super::DroppedDate) entries on the search report.
#[derive(Debug, Error)]
pub enum TrendError {
    /// Query rejected before any request was sent
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// The candidate-date listing call failed
    #[error("Failed to list candidate dates for {keyword:?}: {source}")]
    Listing {
        keyword: String,
        #[source]
        source: FetchError,
    },
}

impl TrendError {
    /// Whether re-running the same search later could succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidQuery(_) => false,
            Self::Listing { source, .. } => source.is_recoverable(),
        }
    }
}

/// Result type for trend search operations
pub type TrendResult<T> = Result<T, TrendError>;
