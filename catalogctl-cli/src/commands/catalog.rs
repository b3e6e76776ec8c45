//! Catalog subcommands: thin CLI front-ends over `ComponentCatalog`

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use catalogctl_core::{CatalogConfig, Category, ComponentEntry, Difficulty};
use catalogctl_search::{
    ComponentCatalog, MemoryIndex, SearchIndex, UpstashIndex, START_CURSOR,
};
use clap::{Args, ValueEnum};
use tracing::{info, instrument};

use crate::ui::{self, OutputFormat};

/// Which index implementation backs the catalog
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Backend {
    /// Hosted search service (UPSTASH_SEARCH_REST_URL / UPSTASH_SEARCH_REST_TOKEN)
    #[default]
    Upstash,
    /// In-process index, optionally seeded with --seed; nothing persists
    Memory,
}

/// Shared catalog type used by every subcommand
pub type Catalog = ComponentCatalog<Arc<dyn SearchIndex>>;

/// Open the catalog on the selected backend
pub async fn open_catalog(
    backend: Backend,
    config: &CatalogConfig,
    seed: Option<&PathBuf>,
) -> Result<Catalog> {
    let index: Arc<dyn SearchIndex> = match backend {
        Backend::Upstash => Arc::new(
            UpstashIndex::from_config(&config.search)
                .context("Failed to configure search client")?,
        ),
        Backend::Memory => {
            let index = MemoryIndex::new(config.search.index.clone());
            if let Some(path) = seed {
                let entries = read_entries(path)?;
                index.upsert(&entries).await?;
                info!("Seeded memory index with {} components", entries.len());
            }
            Arc::new(index)
        }
    };
    Ok(ComponentCatalog::new(index))
}

/// Read a JSON array of entries from a file, or stdin for `-`
pub fn read_entries(path: &PathBuf) -> Result<Vec<ComponentEntry>> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read components from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    ComponentEntry::parse_batch(&json)
        .with_context(|| format!("Invalid component batch in {}", path.display()))
}

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// JSON file holding an array of {id, content, metadata} entries ("-" for stdin)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Component IDs to fetch
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

/// Scoring blend for unfiltered searches
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SearchMode {
    /// Relevance with the service's reranking stage
    Rerank,
    /// Meaning-based matching only
    Semantic,
    /// Keyword matching only
    FullText,
    /// Even semantic / keyword blend
    Balanced,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Scoring mode (default: rerank)
    #[arg(long, value_enum, conflicts_with_all = ["category", "difficulty"])]
    pub mode: Option<SearchMode>,

    /// Restrict to a category (input, display, layout, feedback, navigation, overlay)
    #[arg(long, conflicts_with = "difficulty")]
    pub category: Option<Category>,

    /// Restrict to a difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Maximum results to return (default from config, 10)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Component IDs to delete
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Cursor returned by a previous page
    #[arg(long, default_value = START_CURSOR)]
    pub cursor: String,

    /// Page size (default from config, 10)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm that every document in the index should be deleted
    #[arg(long)]
    pub yes: bool,
}

#[instrument(skip_all)]
pub async fn run_upsert(catalog: &Catalog, args: UpsertArgs) -> Result<()> {
    let entries = read_entries(&args.file)?;
    let pb = ui::spinner(format!("Upserting {} components...", entries.len()));
    let result = catalog.upsert_components(&entries).await;
    ui::finish(pb);
    result?;
    println!("Upserted {} components", entries.len());
    Ok(())
}

pub async fn run_fetch(catalog: &Catalog, args: FetchArgs, format: OutputFormat) -> Result<()> {
    let documents = catalog.fetch_components_by_ids(&args.ids).await?;
    ui::print_documents("Components", &documents, format)
}

#[instrument(skip_all, fields(mode = ?args.mode))]
pub async fn run_search(
    catalog: &Catalog,
    args: SearchArgs,
    config: &CatalogConfig,
    format: OutputFormat,
) -> Result<()> {
    let limit = args.limit.unwrap_or(config.search.default_limit);
    let query = args.query.as_str();

    let pb = ui::spinner("Searching...");
    let result = match (args.category, args.difficulty, args.mode) {
        (Some(category), _, _) => {
            catalog
                .search_components_by_category(query, category, limit)
                .await
        }
        (None, Some(difficulty), _) => {
            catalog
                .search_components_by_difficulty(query, difficulty, limit)
                .await
        }
        (None, None, Some(SearchMode::Semantic)) => {
            catalog.search_components_semantic(query, limit).await
        }
        (None, None, Some(SearchMode::FullText)) => {
            catalog.search_components_full_text(query, limit).await
        }
        (None, None, Some(SearchMode::Balanced)) => {
            catalog.search_components_balanced(query, limit).await
        }
        (None, None, Some(SearchMode::Rerank) | None) => {
            catalog.search_components_with_reranking(query, limit).await
        }
    };
    ui::finish(pb);

    ui::print_documents("Search Results", &result?, format)
}

pub async fn run_delete(catalog: &Catalog, args: DeleteArgs) -> Result<()> {
    match args.ids.as_slice() {
        [id] => catalog.delete_component(id).await?,
        ids => catalog.delete_components(ids).await?,
    }
    println!("Deleted {} components", args.ids.len());
    Ok(())
}

pub async fn run_range(
    catalog: &Catalog,
    args: RangeArgs,
    config: &CatalogConfig,
    format: OutputFormat,
) -> Result<()> {
    let limit = args.limit.unwrap_or(config.search.default_limit);
    let page = catalog.range_search_components(&args.cursor, limit).await?;
    ui::print_page(&page, format)
}

pub async fn run_list(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let documents = catalog.get_all_components().await;
    ui::print_documents("All Components", &documents, format)
}

pub async fn run_info(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let info = catalog.get_component_index_info().await?;
    ui::print_info(&info, format)
}

pub async fn run_reset(catalog: &Catalog, args: ResetArgs) -> Result<()> {
    if !args.yes {
        bail!(
            "Refusing to reset index '{}' without --yes (this deletes every document)",
            catalog.index().name()
        );
    }
    catalog.reset_component_index().await?;
    println!("Index '{}' reset", catalog.index().name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BATCH: &str = r#"[
        {
            "id": "btn-1",
            "content": {
                "title": "Button", "description": "Clickable action trigger",
                "category": "input", "subcategory": "action", "tags": ["click"]
            },
            "metadata": { "file": "components/ui/button.tsx", "exports": ["Button"], "difficulty": "easy" }
        }
    ]"#;

    #[test]
    fn test_read_entries_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", BATCH).unwrap();
        let entries = read_entries(&file.path().to_path_buf()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.category, Category::Input);
    }

    #[tokio::test]
    async fn test_memory_backend_seeded() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", BATCH).unwrap();
        let path = file.path().to_path_buf();

        let catalog = open_catalog(Backend::Memory, &CatalogConfig::default(), Some(&path))
            .await
            .unwrap();
        assert_eq!(catalog.get_all_components().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let catalog = open_catalog(Backend::Memory, &CatalogConfig::default(), None)
            .await
            .unwrap();
        let err = run_reset(&catalog, ResetArgs { yes: false }).await.unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }
}
