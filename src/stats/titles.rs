//! Per-title word and section statistics
//!
//! `title_stats.json` maps `"Title N"` to a tree whose inner nodes are
//! subtitles/chapters and whose leaves carry `word_count` and
//! `section_count`. Depth differs between titles, so the tree is modelled as
//! a tagged union and walked with an explicit stack.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};
use std::path::Path;
use std::sync::OnceLock;

use crate::utils::error::DataError;
use crate::utils::read_json;

/// Summed word and section counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub words: u64,
    pub sections: u64,
}

impl Totals {
    #[must_use]
    pub fn new(words: u64, sections: u64) -> Self {
        Self { words, sections }
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            words: self.words + rhs.words,
            sections: self.sections + rhs.sections,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// One node of a title's structure tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsNode {
    /// A chapter or subtitle that was counted directly
    Leaf {
        word_count: u64,
        #[serde(default)]
        section_count: u64,
    },

    /// Named children, e.g. `"Chapter IV"` under `"Subtitle B"`
    Node(BTreeMap<String, StatsNode>),
}

impl StatsNode {
    /// Build a leaf
    #[must_use]
    pub fn leaf(word_count: u64, section_count: u64) -> Self {
        Self::Leaf {
            word_count,
            section_count,
        }
    }

    /// Build an inner node from `(name, child)` pairs
    #[must_use]
    pub fn node<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, StatsNode)>,
        S: Into<String>,
    {
        Self::Node(
            children
                .into_iter()
                .map(|(name, child)| (name.into(), child))
                .collect(),
        )
    }

    /// Counts if this node is a leaf
    #[must_use]
    pub fn leaf_totals(&self) -> Option<Totals> {
        match self {
            Self::Leaf {
                word_count,
                section_count,
            } => Some(Totals::new(*word_count, *section_count)),
            Self::Node(_) => None,
        }
    }

    /// Named child of an inner node
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&StatsNode> {
        match self {
            Self::Node(children) => children.get(name),
            Self::Leaf { .. } => None,
        }
    }

    /// Iterate over the direct children of an inner node
    pub fn children(&self) -> impl Iterator<Item = (&str, &StatsNode)> {
        let map = match self {
            Self::Node(children) => Some(children),
            Self::Leaf { .. } => None,
        };
        map.into_iter()
            .flat_map(|children| children.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Sum over every leaf below this node
    #[must_use]
    pub fn totals(&self) -> Totals {
        let mut total = Totals::default();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            match node {
                Self::Leaf {
                    word_count,
                    section_count,
                } => total += Totals::new(*word_count, *section_count),
                Self::Node(children) => stack.extend(children.values()),
            }
        }

        total
    }
}

/// Totals for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleTotal {
    /// Key as it appears in the statistics file, e.g. `"Title 40"`
    pub title: String,

    /// Parsed title number when the key follows the usual pattern
    pub number: Option<u32>,

    pub totals: Totals,
}

/// Parse `"Title 12"` into `12`
#[must_use]
pub fn title_number(key: &str) -> Option<u32> {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();

    let re = TITLE_RE.get_or_init(|| Regex::new(r"^Title\s+(\d+)$").expect("Invalid regex pattern"));

    re.captures(key.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// All titles keyed by `"Title N"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleStats {
    titles: BTreeMap<String, StatsNode>,
}

impl TitleStats {
    /// Load `title_stats.json`
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let stats: Self = read_json(path)?;
        tracing::debug!(path = %path.display(), titles = stats.len(), "Loaded title statistics");
        Ok(stats)
    }

    /// Build from `(key, tree)` pairs
    #[must_use]
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = (S, StatsNode)>,
        S: Into<String>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Tree for title `number`
    #[must_use]
    pub fn title(&self, number: u32) -> Option<&StatsNode> {
        self.titles.get(&format!("Title {number}"))
    }

    /// One row per title, in title-number order
    #[must_use]
    pub fn title_totals(&self) -> Vec<TitleTotal> {
        let mut rows: Vec<TitleTotal> = self
            .titles
            .iter()
            .map(|(title, node)| TitleTotal {
                title: title.clone(),
                number: title_number(title),
                totals: node.totals(),
            })
            .collect();

        rows.sort_by(|a, b| {
            a.number
                .unwrap_or(u32::MAX)
                .cmp(&b.number.unwrap_or(u32::MAX))
                .then_with(|| a.title.cmp(&b.title))
        });

        rows
    }

    /// Words and sections across every title
    #[must_use]
    pub fn grand_total(&self) -> Totals {
        self.titles.values().map(StatsNode::totals).sum()
    }
}
