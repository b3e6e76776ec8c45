//! catalogctl-core - data model and shared plumbing for the component catalog
//!
//! - [`model`]: component content/metadata, documents, range pages, index info
//! - [`filter`]: structured filter expressions with escaped literals
//! - [`config`]: dotenv + TOML configuration with environment overrides
//! - [`error`]: structured error type

pub mod config;
pub mod error;
pub mod filter;
pub mod model;

pub use config::{CatalogConfig, NavConfig, SearchConfig};
pub use error::{CatalogError, Result};
pub use filter::Filter;
pub use model::{
    Category, ComponentContent, ComponentDocument, ComponentEntry, ComponentMetadata, Difficulty,
    IndexInfo, IndexStats, RangePage,
};
