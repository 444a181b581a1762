//! Agency directory helpers: flattening, slug extraction and the slug catalog

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::models::{Agency, CfrReference};
use crate::utils::error::DataError;
use crate::utils::{read_json, write_json};

/// References keyed by agency name
pub type ReferenceMap = BTreeMap<String, Vec<CfrReference>>;

/// Child agency names keyed by parent name, in directory order
pub type ChildrenMap = BTreeMap<String, Vec<String>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectoryFile {
    Wrapped { agencies: Vec<Agency> },
    Bare(Vec<Agency>),
}

/// Load an agency directory saved from the admin API
///
/// Accepts both `{"agencies": [...]}` and a bare array.
///
/// # Errors
///
/// Returns `DataError` if the file cannot be read or parsed
pub fn load_agency_directory(path: &Path) -> Result<Vec<Agency>, DataError> {
    let agencies = match read_json::<DirectoryFile>(path)? {
        DirectoryFile::Wrapped { agencies } | DirectoryFile::Bare(agencies) => agencies,
    };
    tracing::debug!(path = %path.display(), agencies = agencies.len(), "Loaded agency directory");
    Ok(agencies)
}

/// Split the directory into per-agency references and parent/child links
///
/// Only one level of nesting is considered. A parent gets a reference entry
/// only if it owns references itself; every child gets one.
#[must_use]
pub fn flatten_agencies(agencies: &[Agency]) -> (ReferenceMap, ChildrenMap) {
    let mut references = ReferenceMap::new();
    let mut children = ChildrenMap::new();

    for agency in agencies {
        if !agency.cfr_references.is_empty() {
            references.insert(agency.name.clone(), agency.cfr_references.clone());
        }

        let child_names: Vec<String> = agency
            .children
            .iter()
            .map(|child| {
                references.insert(child.name.clone(), child.cfr_references.clone());
                child.name.clone()
            })
            .collect();

        if !child_names.is_empty() {
            children.insert(agency.name.clone(), child_names);
        }
    }

    (references, children)
}

/// Every slug in the directory, at any depth, sorted and unique
#[must_use]
pub fn extract_slugs(agencies: &[Agency]) -> Vec<String> {
    let mut slugs = BTreeSet::new();
    let mut stack: Vec<&Agency> = agencies.iter().collect();

    while let Some(agency) = stack.pop() {
        if let Some(slug) = agency.slug.as_deref().map(str::trim) {
            if !slug.is_empty() {
                slugs.insert(slug.to_string());
            }
        }
        stack.extend(agency.children.iter());
    }

    slugs.into_iter().collect()
}

/// Known agency slugs, used to validate search filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugCatalog {
    slugs: BTreeSet<String>,
}

impl SlugCatalog {
    #[must_use]
    pub fn from_slugs(slugs: impl IntoIterator<Item = String>) -> Self {
        Self {
            slugs: slugs.into_iter().collect(),
        }
    }

    /// Load `agency_slugs.json` (a JSON array of strings)
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let slugs: Vec<String> = read_json(path)?;
        Ok(Self::from_slugs(slugs))
    }

    /// Write as a sorted JSON array
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let slugs: Vec<&String> = self.slugs.iter().collect();
        write_json(path, &slugs)
    }

    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    /// Like [`contains`](Self::contains), as a `Result`
    ///
    /// # Errors
    ///
    /// Returns `DataError::UnknownSlug` when `slug` is not in the catalog
    pub fn check(&self, slug: &str) -> Result<(), DataError> {
        if self.contains(slug) {
            Ok(())
        } else {
            Err(DataError::UnknownSlug(slug.to_string()))
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agency(name: &str, slug: Option<&str>, refs: Vec<CfrReference>, children: Vec<Agency>) -> Agency {
        Agency {
            name: name.to_string(),
            slug: slug.map(str::to_string),
            cfr_references: refs,
            children,
            ..Default::default()
        }
    }

    fn directory() -> Vec<Agency> {
        vec![
            agency(
                "Agriculture Department",
                Some("agriculture-department"),
                vec![CfrReference::title(7).with_subtitle("A")],
                vec![
                    agency(
                        "Forest Service",
                        Some("forest-service"),
                        vec![CfrReference::title(36).with_chapter("II")],
                        vec![],
                    ),
                    agency("Empty Office", None, vec![], vec![]),
                ],
            ),
            agency("Reference-less Council", Some("council"), vec![], vec![]),
            agency("Duplicate Slug Office", Some("forest-service"), vec![], vec![]),
        ]
    }

    #[test]
    fn test_flatten_one_level() {
        let (refs, children) = flatten_agencies(&directory());

        assert_eq!(refs.len(), 3);
        assert!(refs.contains_key("Agriculture Department"));
        assert!(refs.contains_key("Forest Service"));
        assert_eq!(refs["Empty Office"], Vec::new());
        assert!(!refs.contains_key("Reference-less Council"));

        assert_eq!(children.len(), 1);
        assert_eq!(
            children["Agriculture Department"],
            vec!["Forest Service".to_string(), "Empty Office".to_string()]
        );
    }

    #[test]
    fn test_extract_slugs_recursive_sorted_unique() {
        let slugs = extract_slugs(&directory());
        assert_eq!(
            slugs,
            vec![
                "agriculture-department".to_string(),
                "council".to_string(),
                "forest-service".to_string()
            ]
        );
    }

    #[test]
    fn test_catalog_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agency_slugs.json");

        let catalog = SlugCatalog::from_slugs(extract_slugs(&directory()));
        catalog.save(&path).unwrap();

        let loaded = SlugCatalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
        assert!(loaded.contains("council"));
        assert!(!loaded.contains("Council"));
        assert!(matches!(
            loaded.check("Council"),
            Err(DataError::UnknownSlug(slug)) if slug == "Council"
        ));
    }

    #[test]
    fn test_load_directory_both_shapes() {
        let dir = tempfile::tempdir().unwrap();

        let wrapped = dir.path().join("wrapped.json");
        std::fs::write(&wrapped, r#"{"agencies": [{"name": "A", "slug": "a"}]}"#).unwrap();
        assert_eq!(load_agency_directory(&wrapped).unwrap().len(), 1);

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, r#"[{"name": "A"}, {"name": "B"}]"#).unwrap();
        assert_eq!(load_agency_directory(&bare).unwrap().len(), 2);
    }
}
