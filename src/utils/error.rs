//! Error types for the cfrscope client and data loaders
//!
//! This module defines the domain error types used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the eCFR API
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code returned by the server
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body was not the JSON we expected
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Response decoded but a required field was absent or not numeric
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a transport error, separating timeouts from the rest
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err)
        }
    }

    /// Whether retrying the same request later could plausibly succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Decode(_) | Self::MissingField(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors that can occur while loading or resolving static statistics files
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents were not the expected JSON shape
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Agency name not present in the summary
    #[error("Agency not found: {0}")]
    UnknownAgency(String),

    /// Agency slug not present in the slug catalog
    #[error("Unknown agency slug: {0}")]
    UnknownSlug(String),
}
