pub mod directory;
pub mod stats;
pub mod trend;

// Re-export command functions for convenience
pub use directory::{slugs, summarize, DirectorySource};
pub use stats::{agencies, references, titles, AgencyTableParams};
pub use trend::{trend, TrendParams};
