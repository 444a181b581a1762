// Core data structures shared by the client and the statistics module

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Agency record from the eCFR admin directory
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Agency {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub cfr_references: Vec<CfrReference>,
    #[serde(default)]
    pub children: Vec<Agency>,
}

fn unknown_name() -> String {
    String::from("unknown")
}

/// A pointer into the CFR hierarchy owned by an agency
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CfrReference {
    pub title: u32,
    #[serde(default, deserialize_with = "label", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "label", skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, deserialize_with = "label", skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

/// Accept `"IV"`, `12`, `null` or `""` for hierarchy labels
fn label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Raw::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl CfrReference {
    /// Reference to a whole title
    #[must_use]
    pub fn title(title: u32) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    /// Builder: set the subtitle
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// Builder: set the chapter
    #[must_use]
    pub fn with_chapter(mut self, chapter: &str) -> Self {
        self.chapter = Some(chapter.to_string());
        self
    }

    /// Builder: set the part
    #[must_use]
    pub fn with_part(mut self, part: &str) -> Self {
        self.part = Some(part.to_string());
        self
    }

    /// Link to the current text of this reference on ecfr.gov
    #[must_use]
    pub fn ecfr_url(&self, base: &str) -> String {
        let mut url = format!("{}/current/title-{}", base.trim_end_matches('/'), self.title);
        if let Some(subtitle) = &self.subtitle {
            url.push_str(&format!("/subtitle-{subtitle}"));
        }
        if let Some(chapter) = &self.chapter {
            url.push_str(&format!("/chapter-{chapter}"));
        }
        if let Some(part) = &self.part {
            url.push_str(&format!("/part-{part}"));
        }
        url
    }
}

impl fmt::Display for CfrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title {}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            write!(f, " > Subtitle {subtitle}")?;
        }
        if let Some(chapter) = &self.chapter {
            write!(f, " > Chapter {chapter}")?;
        }
        if let Some(part) = &self.part {
            write!(f, " > Part {part}")?;
        }
        Ok(())
    }
}
