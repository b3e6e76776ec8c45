//! In-process index with the same contract as the hosted service
//!
//! Scoring is a naive term count over content fields; reranking and semantic
//! weight are accepted and ignored. Filters are evaluated structurally
//! against the document's content, then its metadata.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use catalogctl_core::{
    ComponentDocument, ComponentEntry, Filter, IndexInfo, IndexStats, RangePage,
};
use serde_json::Value;

use crate::index::{RangeRequest, SearchError, SearchIndex, SearchRequest};

/// Documents kept in a sorted map keyed by id
#[derive(Debug)]
pub struct MemoryIndex {
    name: String,
    documents: RwLock<BTreeMap<String, ComponentEntry>>,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new("components")
    }
}

impl MemoryIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, ComponentEntry>>, SearchError> {
        self.documents
            .read()
            .map_err(|_| SearchError::Unavailable("memory index lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, ComponentEntry>>, SearchError> {
        self.documents
            .write()
            .map_err(|_| SearchError::Unavailable("memory index lock poisoned".into()))
    }
}

const MAX_TERM_SCORE: f64 = 6.0;

/// Term-count relevance normalized to 0..=1: title hits weigh most, then tags, then the rest
fn score(entry: &ComponentEntry, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let content = &entry.content;
    let title = content.title.to_lowercase();
    let description = content.description.to_lowercase();
    let subcategory = content.subcategory.to_lowercase();
    let category = content.category.as_str();

    terms
        .iter()
        .map(|term| {
            let mut s = 0.0;
            if title.contains(term.as_str()) {
                s += 3.0;
            }
            if content.tags.iter().any(|t| t.to_lowercase().contains(term.as_str())) {
                s += 2.0;
            }
            if description.contains(term.as_str())
                || subcategory.contains(term.as_str())
                || category.contains(term.as_str())
            {
                s += 1.0;
            }
            s
        })
        .sum::<f64>()
        / (MAX_TERM_SCORE * terms.len() as f64)
}

/// Look up a dotted path in a JSON object
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Array(items) => items.iter().any(|item| value_matches(item, expected)),
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        _ => false,
    }
}

/// Evaluate a filter against an entry's content, falling back to metadata
pub fn filter_matches(filter: &Filter, entry: &ComponentEntry) -> bool {
    match filter {
        Filter::Eq { field, value } => {
            let content = serde_json::to_value(&entry.content).unwrap_or(Value::Null);
            let metadata = serde_json::to_value(&entry.metadata).unwrap_or(Value::Null);
            lookup(&content, field)
                .or_else(|| lookup(&metadata, field))
                .is_some_and(|found| value_matches(found, value))
        }
        Filter::And(parts) => parts.iter().all(|part| filter_matches(part, entry)),
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, entries: &[ComponentEntry]) -> Result<(), SearchError> {
        let mut docs = self.write()?;
        for entry in entries {
            docs.insert(entry.id.clone(), entry.clone());
        }
        Ok(())
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<ComponentDocument>, SearchError> {
        let docs = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| docs.get(id))
            .cloned()
            .map(ComponentDocument::from)
            .collect())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ComponentDocument>, SearchError> {
        let terms: Vec<String> = request
            .query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let docs = self.read()?;
        let mut hits: Vec<(f64, &ComponentEntry)> = docs
            .values()
            .filter(|entry| {
                request
                    .filter
                    .as_ref()
                    .map_or(true, |filter| filter_matches(filter, entry))
            })
            .map(|entry| (score(entry, &terms), entry))
            .filter(|(s, _)| terms.is_empty() || *s > 0.0)
            .collect();

        // Highest score first; ties keep id order (the map is sorted)
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(hits
            .into_iter()
            .take(request.limit)
            .map(|(s, entry)| ComponentDocument {
                score: Some(s),
                ..ComponentDocument::from(entry.clone())
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<u64, SearchError> {
        let mut docs = self.write()?;
        let deleted = ids.iter().filter(|id| docs.remove(*id).is_some()).count();
        Ok(deleted as u64)
    }

    async fn range(&self, request: &RangeRequest) -> Result<RangePage, SearchError> {
        let offset: usize = request
            .cursor
            .parse()
            .map_err(|_| SearchError::invalid(format!("invalid cursor '{}'", request.cursor)))?;

        let docs = self.read()?;
        let documents: Vec<ComponentDocument> = docs
            .values()
            .skip(offset)
            .take(request.limit)
            .cloned()
            .map(ComponentDocument::from)
            .collect();

        let next = offset + documents.len();
        let next_cursor = if documents.is_empty() || next >= docs.len() {
            String::new()
        } else {
            next.to_string()
        };

        Ok(RangePage {
            next_cursor,
            documents,
        })
    }

    async fn reset(&self) -> Result<(), SearchError> {
        self.write()?.clear();
        Ok(())
    }

    async fn info(&self) -> Result<IndexInfo, SearchError> {
        let count = self.read()?.len() as u64;
        let mut info = IndexInfo {
            document_count: count,
            ..IndexInfo::default()
        };
        info.indexes.insert(
            self.name.clone(),
            IndexStats {
                pending_document_count: 0,
                document_count: count,
            },
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogctl_core::{Category, ComponentContent, ComponentMetadata, Difficulty};

    fn entry(id: &str, title: &str, category: Category, difficulty: Difficulty) -> ComponentEntry {
        ComponentEntry {
            id: id.into(),
            content: ComponentContent {
                title: title.into(),
                description: format!("{} component", title),
                category,
                subcategory: "general".into(),
                tags: ["ui".to_string()].into_iter().collect(),
            },
            metadata: ComponentMetadata {
                file: format!("components/ui/{}.tsx", id),
                exports: vec![title.into()],
                dependencies: None,
                difficulty,
            },
        }
    }

    async fn seeded() -> MemoryIndex {
        let index = MemoryIndex::default();
        index
            .upsert(&[
                entry("btn-1", "Button", Category::Input, Difficulty::Easy),
                entry("dlg-1", "Dialog", Category::Overlay, Difficulty::Medium),
                entry("tbl-1", "Data Table", Category::Display, Difficulty::Hard),
            ])
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let index = seeded().await;
        index
            .upsert(&[entry("btn-1", "Icon Button", Category::Input, Difficulty::Easy)])
            .await
            .unwrap();
        assert_eq!(index.len(), 3);
        let docs = index.fetch(&["btn-1".to_string()]).await.unwrap();
        assert_eq!(docs[0].content.title, "Icon Button");
    }

    #[tokio::test]
    async fn test_search_ranks_title_hits_first() {
        let index = seeded().await;
        let hits = index
            .search(&SearchRequest::new("dialog", 10))
            .await
            .unwrap();
        assert_eq!(hits[0].id, "dlg-1");
        assert!(hits.iter().all(|h| h.score.unwrap_or(0.0) > 0.0));
    }

    #[tokio::test]
    async fn test_search_filter_on_metadata() {
        let index = seeded().await;
        let hits = index
            .search(&SearchRequest::new("component", 10).filter(Filter::difficulty(Difficulty::Hard)))
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["tbl-1"]);
    }

    #[tokio::test]
    async fn test_filter_with_quote_matches_literally() {
        let index = seeded().await;
        let filter = Filter::eq("category", "input' OR category = 'overlay").unwrap();
        let hits = index
            .search(&SearchRequest::new("component", 10).filter(filter))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_range_paginates() {
        let index = seeded().await;
        let first = index
            .range(&RangeRequest { cursor: "0".into(), limit: 2 })
            .await
            .unwrap();
        assert_eq!(first.documents.len(), 2);
        assert_eq!(first.next_cursor, "2");

        let second = index
            .range(&RangeRequest { cursor: first.next_cursor, limit: 2 })
            .await
            .unwrap();
        assert_eq!(second.documents.len(), 1);
        assert!(second.is_last());
    }

    #[tokio::test]
    async fn test_range_rejects_foreign_cursor() {
        let index = seeded().await;
        let result = index
            .range(&RangeRequest { cursor: "abc".into(), limit: 2 })
            .await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_and_info() {
        let index = seeded().await;
        let deleted = index
            .delete(&["btn-1".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        let info = index.info().await.unwrap();
        assert_eq!(info.document_count, 2);
        assert_eq!(info.indexes["components"].document_count, 2);
    }
}
