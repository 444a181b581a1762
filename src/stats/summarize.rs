//! Building the agency summary from the directory and title statistics

use std::collections::{BTreeMap, BTreeSet};

use super::agency::{AgencyRecord, AgencySummary, ChildTotals};
use super::directory::{ChildrenMap, ReferenceMap};
use super::titles::{StatsNode, TitleStats, Totals};
use crate::models::CfrReference;

/// Resolve one reference against its title's tree
///
/// - subtitle and chapter: the chapter leaf under that subtitle
/// - chapter only: a top-level chapter leaf, else the first subtitle holding it
/// - subtitle only: the subtitle leaf, else the sum of its direct leaf children
///
/// Anything else, including references that only name a part, resolves to zero.
#[must_use]
pub fn reference_totals(title: &StatsNode, reference: &CfrReference) -> Totals {
    match (reference.subtitle.as_deref(), reference.chapter.as_deref()) {
        (Some(subtitle), Some(chapter)) => title
            .child(&format!("Subtitle {subtitle}"))
            .and_then(|node| node.child(&format!("Chapter {chapter}")))
            .and_then(StatsNode::leaf_totals)
            .unwrap_or_default(),
        (None, Some(chapter)) => {
            let key = format!("Chapter {chapter}");
            title
                .child(&key)
                .or_else(|| title.children().find_map(|(_, node)| node.child(&key)))
                .and_then(StatsNode::leaf_totals)
                .unwrap_or_default()
        }
        (Some(subtitle), None) => match title.child(&format!("Subtitle {subtitle}")) {
            Some(node) => node.leaf_totals().unwrap_or_else(|| {
                node.children()
                    .filter_map(|(_, child)| child.leaf_totals())
                    .sum()
            }),
            None => Totals::default(),
        },
        (None, None) => Totals::default(),
    }
}

/// Sum each agency's references, then roll children up into their parents
///
/// Child agencies also keep their own entry. References to titles missing
/// from `title_stats` are logged and skipped.
#[must_use]
pub fn summarize_agency_totals(
    references: &ReferenceMap,
    children: &ChildrenMap,
    title_stats: &TitleStats,
) -> AgencySummary {
    let raw: BTreeMap<&str, Totals> = references
        .iter()
        .map(|(agency, refs)| {
            let totals: Totals = refs
                .iter()
                .filter_map(|reference| match title_stats.title(reference.title) {
                    Some(title) => Some(reference_totals(title, reference)),
                    None => {
                        tracing::warn!(
                            agency = %agency,
                            title = reference.title,
                            "Title not found in statistics, skipping reference"
                        );
                        None
                    }
                })
                .sum();
            (agency.as_str(), totals)
        })
        .collect();

    let names: BTreeSet<&str> = references
        .keys()
        .chain(children.keys())
        .map(String::as_str)
        .collect();

    let mut summary = AgencySummary::default();
    for name in names {
        let own = raw.get(name).copied().unwrap_or_default();

        let child_rows: Vec<ChildTotals> = children
            .get(name)
            .into_iter()
            .flatten()
            .map(|child| {
                let totals = raw.get(child.as_str()).copied().unwrap_or_default();
                ChildTotals {
                    agency: child.clone(),
                    words: totals.words,
                    sections: totals.sections,
                }
            })
            .collect();

        let child_sum: Totals = child_rows
            .iter()
            .map(|c| Totals::new(c.words, c.sections))
            .sum();
        let total = own + child_sum;

        summary.insert(
            name,
            AgencyRecord {
                words: total.words,
                sections: total.sections,
                children: child_rows,
                references: references.get(name).cloned().unwrap_or_default(),
            },
        );
    }

    tracing::info!(agencies = summary.len(), "Summarized agency totals");

    summary
}
