//! Unified error handling for the cfrscope crate
//!
//! Each module keeps its own error enum; this module folds them into a single
//! `Error` for callers that cross module boundaries.
//!
//! # Architecture
//!
//! - [`CfrErrorTrait`] - Common interface implemented by the error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use cfrscope::error::{CfrErrorTrait, Error};
//!
//! fn report(err: &Error) {
//!     if err.is_recoverable() {
//!         eprintln!("Try again later: {err}");
//!     } else {
//!         eprintln!("{} error: {err}", err.category());
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

pub use crate::trends::error::TrendError;
pub use crate::utils::error::{DataError, FetchError};

/// Common trait for cfrscope error types
pub trait CfrErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP, timeout and upstream status errors
    Network,
    /// Malformed responses and data files
    Parsing,
    /// Missing files, unknown agencies or slugs
    Data,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Data => "data",
            Self::Config => "config",
            Self::Other => "other",
        })
    }
}

impl CfrErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        FetchError::is_recoverable(self)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) | Self::MissingField(_) => ErrorCategory::Parsing,
            Self::InvalidUrl(_) => ErrorCategory::Config,
            Self::Http(_) | Self::ServerError(_) | Self::Timeout => ErrorCategory::Network,
        }
    }
}

impl CfrErrorTrait for TrendError {
    fn is_recoverable(&self) -> bool {
        TrendError::is_recoverable(self)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidQuery(_) => ErrorCategory::Config,
            Self::Listing { source, .. } => source.category(),
        }
    }
}

impl CfrErrorTrait for DataError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Json { .. } => ErrorCategory::Parsing,
            Self::Io { .. } | Self::UnknownAgency(_) | Self::UnknownSlug(_) => ErrorCategory::Data,
        }
    }
}

/// Unified error type for the cfrscope crate
#[derive(Error, Debug)]
pub enum Error {
    /// eCFR API errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Keyword trend search errors
    #[error("Trend search error: {0}")]
    Trend(#[from] TrendError),

    /// Local statistics file errors
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML config parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CfrErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => CfrErrorTrait::is_recoverable(e),
            Self::Trend(e) => CfrErrorTrait::is_recoverable(e),
            Self::Data(e) => CfrErrorTrait::is_recoverable(e),
            Self::Io(_) => true,
            Self::Http(_) => true,
            Self::Json(_) | Self::Toml(_) | Self::Config(_) | Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Trend(e) => e.category(),
            Self::Data(e) => e.category(),
            Self::Http(_) => ErrorCategory::Network,
            Self::Io(_) => ErrorCategory::Data,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
