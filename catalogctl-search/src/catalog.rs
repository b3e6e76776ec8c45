//! Component catalog operations
//!
//! Each operation is exactly one call on the underlying [`SearchIndex`].
//! Failures are logged with the operation name and handed back unchanged;
//! nothing is retried. [`ComponentCatalog::get_all_components`] is the one
//! best-effort read: it reports failure as an empty listing.

use catalogctl_core::{
    Category, ComponentDocument, ComponentEntry, Difficulty, Filter, IndexInfo, RangePage,
};
use tracing::{error, info, instrument, warn};

use crate::index::{RangeRequest, SearchError, SearchIndex, SearchRequest};

/// Result limit used when the caller has no preference
pub const DEFAULT_LIMIT: usize = 10;
/// Cursor that starts a range scan from the beginning
pub const START_CURSOR: &str = "0";
/// Page size of the single scan behind `get_all_components`
pub const LIST_ALL_LIMIT: usize = 1000;

/// Semantic weight for meaning-only search
pub const SEMANTIC_ONLY: f64 = 1.0;
/// Semantic weight for keyword-only search
pub const FULL_TEXT_ONLY: f64 = 0.0;
/// Semantic weight for an even blend
pub const BALANCED: f64 = 0.5;

/// Log a failed operation and pass the error through
fn report<T>(operation: &str, result: Result<T, SearchError>) -> Result<T, SearchError> {
    result.map_err(|err| {
        error!(operation, error = %err, "Error {}", operation);
        err
    })
}

fn check_limit(limit: usize) -> Result<(), SearchError> {
    if limit == 0 {
        return Err(SearchError::invalid("limit must be positive"));
    }
    Ok(())
}

/// At least one id, and none blank
fn check_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), SearchError> {
    let mut ids = ids.into_iter().peekable();
    if ids.peek().is_none() {
        return Err(SearchError::invalid("at least one component id is required"));
    }
    if ids.any(|id| id.trim().is_empty()) {
        return Err(SearchError::invalid("component ids must not be empty"));
    }
    Ok(())
}

/// The component catalog, backed by any [`SearchIndex`]
#[derive(Debug)]
pub struct ComponentCatalog<I> {
    index: I,
}

impl<I: SearchIndex> ComponentCatalog<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// The underlying index
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Write or replace a batch of components by id
    #[instrument(skip_all, fields(index = self.index.name(), count = components.len()))]
    pub async fn upsert_components(&self, components: &[ComponentEntry]) -> Result<(), SearchError> {
        let result = match check_ids(components.iter().map(|c| c.id.as_str())) {
            Ok(()) => self.index.upsert(components).await,
            Err(err) => Err(err),
        };
        report("upserting components", result)?;
        info!("Successfully upserted {} components", components.len());
        Ok(())
    }

    /// Components for exactly these ids; unknown ids are left out
    #[instrument(skip_all, fields(index = self.index.name(), count = ids.len()))]
    pub async fn fetch_components_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        let result = match check_ids(ids.iter().map(String::as_str)) {
            Ok(()) => self.index.fetch(ids).await,
            Err(err) => Err(err),
        };
        report("fetching components by ids", result)
    }

    /// Relevance search with the service's reranking stage
    pub async fn search_components_with_reranking(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components with reranking",
            SearchRequest::new(query, limit).reranked(),
        )
        .await
    }

    /// Meaning-based matching only
    pub async fn search_components_semantic(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components semantically",
            SearchRequest::new(query, limit).semantic_weight(SEMANTIC_ONLY),
        )
        .await
    }

    /// Keyword matching only
    pub async fn search_components_full_text(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components full-text",
            SearchRequest::new(query, limit).semantic_weight(FULL_TEXT_ONLY),
        )
        .await
    }

    /// Even blend of semantic and keyword scoring
    pub async fn search_components_balanced(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components balanced",
            SearchRequest::new(query, limit).semantic_weight(BALANCED),
        )
        .await
    }

    /// Reranked search restricted to one category
    pub async fn search_components_by_category(
        &self,
        query: &str,
        category: Category,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components by category",
            SearchRequest::new(query, limit)
                .reranked()
                .filter(Filter::category(category)),
        )
        .await
    }

    /// Reranked search restricted to one difficulty
    pub async fn search_components_by_difficulty(
        &self,
        query: &str,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        self.run_search(
            "searching components by difficulty",
            SearchRequest::new(query, limit)
                .reranked()
                .filter(Filter::difficulty(difficulty)),
        )
        .await
    }

    #[instrument(skip_all, fields(index = self.index.name(), limit = request.limit))]
    async fn run_search(
        &self,
        operation: &'static str,
        request: SearchRequest,
    ) -> Result<Vec<ComponentDocument>, SearchError> {
        let result = match check_limit(request.limit) {
            Ok(()) => self.index.search(&request).await,
            Err(err) => Err(err),
        };
        report(operation, result)
    }

    /// Remove one component
    #[instrument(skip(self), fields(index = self.index.name()))]
    pub async fn delete_component(&self, id: &str) -> Result<(), SearchError> {
        let result = match check_ids([id]) {
            Ok(()) => self.index.delete(&[id.to_string()]).await,
            Err(err) => Err(err),
        };
        report("deleting component", result)?;
        info!("Deleted component: {}", id);
        Ok(())
    }

    /// Remove a batch of components
    #[instrument(skip_all, fields(index = self.index.name(), count = ids.len()))]
    pub async fn delete_components(&self, ids: &[String]) -> Result<(), SearchError> {
        let result = match check_ids(ids.iter().map(String::as_str)) {
            Ok(()) => self.index.delete(ids).await,
            Err(err) => Err(err),
        };
        report("deleting components", result)?;
        info!("Deleted {} components", ids.len());
        Ok(())
    }

    /// One page of a cursor-paginated listing
    #[instrument(skip(self), fields(index = self.index.name()))]
    pub async fn range_search_components(
        &self,
        cursor: &str,
        limit: usize,
    ) -> Result<RangePage, SearchError> {
        let result = match check_limit(limit) {
            Ok(()) => {
                self.index
                    .range(&RangeRequest {
                        cursor: cursor.to_string(),
                        limit,
                    })
                    .await
            }
            Err(err) => Err(err),
        };
        report("range searching components", result)
    }

    /// Database and namespace statistics
    #[instrument(skip(self), fields(index = self.index.name()))]
    pub async fn get_component_index_info(&self) -> Result<IndexInfo, SearchError> {
        report("getting index info", self.index.info().await)
    }

    /// Delete every document in the index. Irreversible.
    #[instrument(skip(self), fields(index = self.index.name()))]
    pub async fn reset_component_index(&self) -> Result<(), SearchError> {
        report("resetting component index", self.index.reset().await)?;
        info!("Component index reset successfully");
        Ok(())
    }

    /// Best-effort listing: one scan of up to [`LIST_ALL_LIMIT`] documents,
    /// or an empty list if the scan fails
    #[instrument(skip(self), fields(index = self.index.name()))]
    pub async fn get_all_components(&self) -> Vec<ComponentDocument> {
        let request = RangeRequest {
            cursor: START_CURSOR.to_string(),
            limit: LIST_ALL_LIMIT,
        };
        match self.index.range(&request).await {
            Ok(page) => page.documents,
            Err(err) => {
                warn!(error = %err, "Error getting all components, returning empty list");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryIndex;

    #[tokio::test]
    async fn test_zero_limit_rejected_locally() {
        let catalog = ComponentCatalog::new(MemoryIndex::default());
        let result = catalog.search_components_semantic("button", 0).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));

        let result = catalog.range_search_components(START_CURSOR, 0).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_id_rejected_locally() {
        let catalog = ComponentCatalog::new(MemoryIndex::default());
        assert!(catalog.delete_component("").await.is_err());
        assert!(catalog
            .fetch_components_by_ids(&["ok".to_string(), " ".to_string()])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_id_batch_rejected_locally() {
        let catalog = ComponentCatalog::new(MemoryIndex::default());

        let result = catalog.fetch_components_by_ids(&[]).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
        let result = catalog.delete_components(&[]).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
        let result = catalog.upsert_components(&[]).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_all_on_empty_index() {
        let catalog = ComponentCatalog::new(MemoryIndex::default());
        assert!(catalog.get_all_components().await.is_empty());
    }
}
