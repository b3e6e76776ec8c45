//! Hosted search (Upstash Search) REST client
//!
//! Every endpoint takes JSON and answers with `{"result": ...}` on success or
//! `{"error": "..."}` on failure. Documents live under a named index.

use std::time::Duration;

use async_trait::async_trait;
use catalogctl_core::{
    ComponentDocument, ComponentEntry, Filter, IndexInfo, RangePage, SearchConfig,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::index::{RangeRequest, SearchError, SearchIndex, SearchRequest};

/// Upper bound on error bodies kept in messages and logs
const MAX_ERROR_BODY: usize = 500;

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchBody<'a> {
    ids: &'a [String],
    include_data: bool,
    include_metadata: bool,
}

/// Request body for the search endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    top_k: usize,
    include_data: bool,
    include_metadata: bool,
    reranking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Filter>,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct Deleted {
    deleted: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeBody<'a> {
    cursor: &'a str,
    limit: usize,
    include_data: bool,
    include_metadata: bool,
}

/// REST client bound to one index
#[derive(Debug, Clone)]
pub struct UpstashIndex {
    client: Client,
    base_url: Url,
    token: String,
    index: String,
}

impl UpstashIndex {
    /// Create a client for `index` on the database at `base_url`
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        index: impl Into<String>,
    ) -> Result<Self, SearchError> {
        Self::with_client(Client::new(), base_url, token, index)
    }

    /// Create a client reusing a preconfigured reqwest client
    pub fn with_client(
        client: Client,
        base_url: &str,
        token: impl Into<String>,
        index: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SearchError::invalid(format!("invalid search URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::invalid(format!(
                "search URL '{}' cannot carry a path",
                base_url
            )));
        }
        let index = index.into();
        if index.trim().is_empty() {
            return Err(SearchError::invalid("index name must not be empty"));
        }
        Ok(Self {
            client,
            base_url,
            token: token.into(),
            index,
        })
    }

    /// Build from loaded configuration (URL, token, index, optional timeout)
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let (url, token) = config
            .credentials()
            .map_err(|e| SearchError::invalid(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Self::with_client(client, url, token, config.index.clone())
    }

    /// `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Endpoint scoped to this index, e.g. `{base}/search/components`
    fn index_endpoint(&self, operation: &str) -> Url {
        self.endpoint(&[operation, self.index.as_str()])
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<T, SearchError> {
        let response = request.bearer_auth(&self.token).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the service's own error message when the body is an envelope
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(body);
            return Err(SearchError::Service {
                status: status.as_u16(),
                message: truncate(&message, MAX_ERROR_BODY),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| SearchError::Decode {
            context,
            message: e.to_string(),
        })?;

        if let Some(message) = envelope.error {
            return Err(SearchError::Service {
                status: status.as_u16(),
                message: truncate(&message, MAX_ERROR_BODY),
            });
        }

        envelope.result.ok_or(SearchError::Decode {
            context,
            message: "missing result".to_string(),
        })
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[async_trait]
impl SearchIndex for UpstashIndex {
    fn name(&self) -> &str {
        &self.index
    }

    async fn upsert(&self, entries: &[ComponentEntry]) -> Result<(), SearchError> {
        let url = self.index_endpoint("upsert-data");
        debug!(%url, count = entries.len(), "upsert");
        let _: serde_json::Value = self
            .send(self.client.post(url).json(entries), "upsert")
            .await?;
        Ok(())
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<ComponentDocument>, SearchError> {
        let url = self.index_endpoint("fetch");
        debug!(%url, count = ids.len(), "fetch");
        let body = FetchBody {
            ids,
            include_data: true,
            include_metadata: true,
        };
        let documents: Vec<Option<ComponentDocument>> =
            self.send(self.client.post(url).json(&body), "fetch").await?;
        Ok(documents.into_iter().flatten().collect())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ComponentDocument>, SearchError> {
        let url = self.index_endpoint("search");
        debug!(%url, limit = request.limit, "search");
        let body = SearchBody {
            query: &request.query,
            top_k: request.limit,
            include_data: true,
            include_metadata: true,
            reranking: request.reranking,
            semantic_weight: request.semantic_weight,
            filter: request.filter.as_ref(),
        };
        self.send(self.client.post(url).json(&body), "search").await
    }

    async fn delete(&self, ids: &[String]) -> Result<u64, SearchError> {
        let url = self.index_endpoint("delete");
        debug!(%url, count = ids.len(), "delete");
        let deleted: Deleted = self
            .send(self.client.post(url).json(&DeleteBody { ids }), "delete")
            .await?;
        Ok(deleted.deleted)
    }

    async fn range(&self, request: &RangeRequest) -> Result<RangePage, SearchError> {
        let url = self.index_endpoint("range");
        debug!(%url, cursor = %request.cursor, limit = request.limit, "range");
        let body = RangeBody {
            cursor: &request.cursor,
            limit: request.limit,
            include_data: true,
            include_metadata: true,
        };
        self.send(self.client.post(url).json(&body), "range").await
    }

    async fn reset(&self) -> Result<(), SearchError> {
        let url = self.index_endpoint("reset");
        debug!(%url, "reset");
        let _: serde_json::Value = self.send(self.client.delete(url), "reset").await?;
        Ok(())
    }

    async fn info(&self) -> Result<IndexInfo, SearchError> {
        let url = self.endpoint(&["info"]);
        debug!(%url, "info");
        self.send(self.client.get(url), "info").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogctl_core::Category;
    use serde_json::json;

    fn client() -> UpstashIndex {
        UpstashIndex::new("https://example-search.upstash.io", "token", "components").unwrap()
    }

    #[test]
    fn test_index_endpoint() {
        let client = client();
        assert_eq!(
            client.index_endpoint("search").as_str(),
            "https://example-search.upstash.io/search/components"
        );
        assert_eq!(
            client.endpoint(&["info"]).as_str(),
            "https://example-search.upstash.io/info"
        );
    }

    #[test]
    fn test_index_name_is_encoded() {
        let client =
            UpstashIndex::new("https://example-search.upstash.io/", "t", "my index/x").unwrap();
        assert_eq!(
            client.index_endpoint("range").as_str(),
            "https://example-search.upstash.io/range/my%20index%2Fx"
        );
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(UpstashIndex::new("not a url", "t", "components").is_err());
        assert!(UpstashIndex::new("https://example.io", "t", " ").is_err());
        assert!(UpstashIndex::from_config(&SearchConfig::default()).is_err());
    }

    #[test]
    fn test_search_body_shape() {
        let filter = Filter::category(Category::Input);
        let body = SearchBody {
            query: "button",
            top_k: 10,
            include_data: true,
            include_metadata: true,
            reranking: true,
            semantic_weight: None,
            filter: Some(&filter),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "query": "button",
                "topK": 10,
                "includeData": true,
                "includeMetadata": true,
                "reranking": true,
                "filter": "category = 'input'"
            })
        );
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "é".repeat(300);
        let out = truncate(&text, 501);
        assert!(out.ends_with("..."));
        assert_eq!(truncate("short", 500), "short");
    }
}
