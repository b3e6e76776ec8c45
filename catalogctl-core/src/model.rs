//! Catalog data model: component content, metadata and the documents the
//! search service hands back.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Component category (searchable, filterable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Input,
    Display,
    Layout,
    Feedback,
    Navigation,
    Overlay,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Input,
        Category::Display,
        Category::Layout,
        Category::Feedback,
        Category::Navigation,
        Category::Overlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Input => "input",
            Category::Display => "display",
            Category::Layout => "layout",
            Category::Feedback => "feedback",
            Category::Navigation => "navigation",
            Category::Overlay => "overlay",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| CatalogError::InvalidVariant {
                kind: "category",
                value: s.to_string(),
                expected: "input, display, layout, feedback, navigation, overlay",
            })
    }
}

/// How hard a component is to adopt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == needle)
            .ok_or_else(|| CatalogError::InvalidVariant {
                kind: "difficulty",
                value: s.to_string(),
                expected: "easy, medium, hard",
            })
    }
}

/// Searchable payload of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContent {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub subcategory: String,
    /// Order is irrelevant; stored sorted so equal sets compare equal
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Auxiliary attributes attached to an entry (not searched)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Source location of the component
    pub file: String,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    pub difficulty: Difficulty,
}

/// One catalog entry as written by upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub content: ComponentContent,
    pub metadata: ComponentMetadata,
}

impl ComponentEntry {
    /// Reject entries the index could not address
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::missing_field("id", "component entry"));
        }
        Ok(())
    }

    /// Parse a JSON array of entries (the `upsert --file` format)
    pub fn parse_batch(json: &str) -> Result<Vec<ComponentEntry>> {
        let entries: Vec<ComponentEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::json("component batch", e))?;
        for entry in &entries {
            entry.validate()?;
        }
        Ok(entries)
    }
}

/// A document as returned by fetch, search and range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    pub id: String,
    pub content: ComponentContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ComponentMetadata>,
    /// Relevance score, only present on search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<ComponentEntry> for ComponentDocument {
    fn from(entry: ComponentEntry) -> Self {
        Self {
            id: entry.id,
            content: entry.content,
            metadata: Some(entry.metadata),
            score: None,
        }
    }
}

/// One page of a range scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePage {
    /// Opaque cursor for the next page; empty when the scan is complete
    pub next_cursor: String,
    pub documents: Vec<ComponentDocument>,
}

impl RangePage {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty() || self.next_cursor == "0"
    }
}

/// Per-index counters inside [`IndexInfo`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub pending_document_count: u64,
    #[serde(default)]
    pub document_count: u64,
}

/// Database-level statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    #[serde(default)]
    pub disk_size: u64,
    #[serde(default)]
    pub pending_document_count: u64,
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub indexes: BTreeMap<String, IndexStats>,
}
