//! catalogctl-search - component catalog access layer
//!
//! This crate provides:
//! - [`SearchIndex`]: the narrow interface over a document index
//! - [`UpstashIndex`]: hosted search REST client
//! - [`MemoryIndex`]: in-process substitute for tests and offline use
//! - [`ComponentCatalog`]: one operation per remote call, log-then-propagate
//!
//! ## Architecture
//!
//! ```text
//! caller → ComponentCatalog ──(SearchRequest / RangeRequest)──→ dyn SearchIndex
//!                                                                 ├─ UpstashIndex → HTTPS
//!                                                                 └─ MemoryIndex  → BTreeMap
//! ```

pub mod catalog;
pub mod index;
pub mod memory;
pub mod upstash;

pub use catalog::{ComponentCatalog, DEFAULT_LIMIT, LIST_ALL_LIMIT, START_CURSOR};
pub use index::{RangeRequest, SearchError, SearchIndex, SearchRequest};
pub use memory::MemoryIndex;
pub use upstash::UpstashIndex;
