//! The narrow interface the catalog layer talks to.
//!
//! Anything that can upsert, fetch, search, delete, range-scan, reset and
//! report on a document index implements [`SearchIndex`]. The hosted REST
//! client and the in-memory index both do.

use std::sync::Arc;

use async_trait::async_trait;
use catalogctl_core::{ComponentDocument, ComponentEntry, Filter, IndexInfo, RangePage};
use thiserror::Error;

/// Failure reported by an index implementation
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("failed to decode {context} response: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("search index unavailable: {0}")]
    Unavailable(String),
}

impl SearchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

/// Parameters of a relevance search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free text, passed to the service untouched
    pub query: String,
    pub limit: usize,
    /// Enable the service's reranking stage
    pub reranking: bool,
    /// 0.0 = keyword only, 1.0 = meaning only; `None` leaves the service default
    pub semantic_weight: Option<f64>,
    pub filter: Option<Filter>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            limit,
            reranking: false,
            semantic_weight: None,
            filter: None,
        }
    }

    pub fn reranked(mut self) -> Self {
        self.reranking = true;
        self
    }

    pub fn semantic_weight(mut self, weight: f64) -> Self {
        self.semantic_weight = Some(weight);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Parameters of one range-scan page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Opaque cursor; "0" starts from the beginning
    pub cursor: String,
    pub limit: usize,
}

/// Document index operations
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of the index (e.g. "components")
    fn name(&self) -> &str;

    /// Write or replace documents by id
    async fn upsert(&self, entries: &[ComponentEntry]) -> Result<(), SearchError>;

    /// Documents for the given ids; unknown ids are omitted
    async fn fetch(&self, ids: &[String]) -> Result<Vec<ComponentDocument>, SearchError>;

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ComponentDocument>, SearchError>;

    /// Remove documents by id, returning how many were deleted
    async fn delete(&self, ids: &[String]) -> Result<u64, SearchError>;

    async fn range(&self, request: &RangeRequest) -> Result<RangePage, SearchError>;

    /// Remove every document in the index
    async fn reset(&self) -> Result<(), SearchError>;

    async fn info(&self) -> Result<IndexInfo, SearchError>;
}

#[async_trait]
impl<T: SearchIndex + ?Sized> SearchIndex for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn upsert(&self, entries: &[ComponentEntry]) -> Result<(), SearchError> {
        (**self).upsert(entries).await
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<ComponentDocument>, SearchError> {
        (**self).fetch(ids).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ComponentDocument>, SearchError> {
        (**self).search(request).await
    }

    async fn delete(&self, ids: &[String]) -> Result<u64, SearchError> {
        (**self).delete(ids).await
    }

    async fn range(&self, request: &RangeRequest) -> Result<RangePage, SearchError> {
        (**self).range(request).await
    }

    async fn reset(&self) -> Result<(), SearchError> {
        (**self).reset().await
    }

    async fn info(&self) -> Result<IndexInfo, SearchError> {
        (**self).info().await
    }
}
