//! Offline CFR statistics
//!
//! Reads the precomputed `title_stats.json`, `agency_summary.json` and
//! `agency_slugs.json` files and derives the tables shown by the CLI.

pub mod agency;
pub mod directory;
pub mod summarize;
pub mod titles;

pub use agency::{
    page_count, paginate, sort_rows, AgencyRecord, AgencyRow, AgencySummary, ChildTotals, SortKey,
    SortOrder,
};
pub use directory::{
    extract_slugs, flatten_agencies, load_agency_directory, ChildrenMap, ReferenceMap, SlugCatalog,
};
pub use summarize::{reference_totals, summarize_agency_totals};
pub use titles::{title_number, StatsNode, TitleStats, TitleTotal, Totals};
