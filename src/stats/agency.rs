//! Agency summary table
//!
//! Loads `agency_summary.json` and provides the sorting and pagination used
//! by the `agencies` command.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::models::CfrReference;
use crate::utils::error::DataError;
use crate::utils::{read_json, write_json};

/// Totals for a sub-agency as listed under its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTotals {
    pub agency: String,
    pub words: u64,
    pub sections: u64,
}

/// One agency's entry in the summary file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyRecord {
    /// Own words plus all children's words
    pub words: u64,

    /// Own sections plus all children's sections
    pub sections: u64,

    #[serde(default)]
    pub children: Vec<ChildTotals>,

    #[serde(default)]
    pub references: Vec<CfrReference>,
}

/// A record paired with its agency name, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyRow {
    pub agency: String,
    pub words: u64,
    pub sections: u64,
    pub children: Vec<ChildTotals>,
    pub references: Vec<CfrReference>,
}

impl AgencyRow {
    /// Whether this row has sub-agencies to expand
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Every agency keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencySummary {
    agencies: BTreeMap<String, AgencyRecord>,
}

impl AgencySummary {
    /// Load `agency_summary.json`
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let summary: Self = read_json(path)?;
        tracing::debug!(path = %path.display(), agencies = summary.len(), "Loaded agency summary");
        Ok(summary)
    }

    /// Write as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        write_json(path, self)
    }

    pub fn insert(&mut self, agency: impl Into<String>, record: AgencyRecord) {
        self.agencies.insert(agency.into(), record);
    }

    #[must_use]
    pub fn get(&self, agency: &str) -> Option<&AgencyRecord> {
        self.agencies.get(agency)
    }

    /// Look up an agency, falling back to a case-insensitive match
    ///
    /// # Errors
    ///
    /// Returns `DataError::UnknownAgency` when nothing matches
    pub fn find(&self, agency: &str) -> Result<(&str, &AgencyRecord), DataError> {
        if let Some((name, record)) = self.agencies.get_key_value(agency) {
            return Ok((name.as_str(), record));
        }

        let needle = agency.to_lowercase();
        self.agencies
            .iter()
            .find(|(name, _)| name.to_lowercase() == needle)
            .map(|(name, record)| (name.as_str(), record))
            .ok_or_else(|| DataError::UnknownAgency(agency.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
    }

    /// Flatten into display rows, in name order
    #[must_use]
    pub fn rows(&self) -> Vec<AgencyRow> {
        self.agencies
            .iter()
            .map(|(agency, record)| AgencyRow {
                agency: agency.clone(),
                words: record.words,
                sections: record.sections,
                children: record.children.clone(),
                references: record.references.clone(),
            })
            .collect()
    }
}

/// Column to sort the agency table by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Agency,
    #[default]
    Words,
    Sections,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agency" | "name" => Ok(Self::Agency),
            "words" => Ok(Self::Words),
            "sections" => Ok(Self::Sections),
            _ => Err(format!(
                "Unknown sort key: {s}. Valid: agency, words, sections"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Agency => "agency",
            Self::Words => "words",
            Self::Sections => "sections",
        })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {s}. Valid: asc, desc")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Sort rows in place; ties keep their existing order
pub fn sort_rows(rows: &mut [AgencyRow], key: SortKey, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Agency => compare_names(&a.agency, &b.agency),
            SortKey::Words => a.words.cmp(&b.words),
            SortKey::Sections => a.sections.cmp(&b.sections),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Rows on zero-based `page`; empty past the end
#[must_use]
pub fn paginate(rows: &[AgencyRow], page: usize, per_page: usize) -> &[AgencyRow] {
    if per_page == 0 {
        return &[];
    }

    let start = page.saturating_mul(per_page);
    if start >= rows.len() {
        return &[];
    }

    let end = start.saturating_add(per_page).min(rows.len());
    &rows[start..end]
}

/// Number of pages needed for `len` rows
#[must_use]
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        len.div_ceil(per_page)
    }
}
