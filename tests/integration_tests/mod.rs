//! Integration tests module
//!
//! End-to-end tests for keyword trend searches, including:
//! - Listing → monthly dedup → sequential counts → rates
//! - Throttling and cancellation
//! - Error handling and degraded results

pub mod error_scenarios;
pub mod fixtures;
pub mod search_pipeline_test;
