//! catalogctl CLI - Component catalog access and navigation shell
//!
//! Catalog subcommands wrap the hosted search index one call at a time:
//! - `upsert`, `fetch`, `delete`, `reset` manage documents
//! - `search` runs reranked, semantic, full-text, balanced, or filtered queries
//! - `range`, `list` page through the index; `info` reports index statistics
//!
//! `nav` starts the terminal navigation shell (Ctrl+K opens the command palette).

use std::path::PathBuf;

use anyhow::Result;
use catalogctl_core::{config::load_dotenv, CatalogConfig};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

mod commands;
mod tracing_setup;
mod tui;
mod ui;

use commands::catalog::{
    self, Backend, DeleteArgs, FetchArgs, RangeArgs, ResetArgs, SearchArgs, UpsertArgs,
};
use commands::nav::{self, NavArgs};
use tracing_setup::{LogTarget, TracingConfig};
use ui::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "catalogctl",
    author,
    version,
    about = "Index and query a UI component catalog on a hosted search service",
    long_about = "Upsert, fetch, search, page through, and reset a catalog of UI components \
                  stored in an Upstash Search index. `nav` opens a terminal navigation shell."
)]
struct Cli {
    /// Index implementation to use
    #[arg(long, value_enum, global = true, default_value_t, env = "CATALOGCTL_BACKEND")]
    backend: Backend,

    /// Index name (overrides config and CATALOGCTL_INDEX)
    #[arg(long, global = true)]
    index: Option<String>,

    /// JSON batch loaded into the memory backend before the command runs (ignored for upstash)
    #[arg(long, global = true, value_name = "PATH")]
    seed: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add or replace components from a JSON batch
    Upsert(UpsertArgs),
    /// Fetch components by ID (missing IDs are skipped)
    Fetch(FetchArgs),
    /// Search components
    Search(SearchArgs),
    /// Delete components by ID
    Delete(DeleteArgs),
    /// Fetch one page of components starting at a cursor
    Range(RangeArgs),
    /// List every component (first page of up to 1000; empty on failure)
    List,
    /// Show document counts and disk usage
    Info,
    /// Delete every document in the index
    Reset(ResetArgs),
    /// Start the terminal navigation shell
    Nav(NavArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        target: log_target(&cli.command),
    })
    .ok();

    ui::init_quiet_mode(cli.quiet);

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

/// The interactive shell draws on the terminal, so its logs go to a file
fn log_target(command: &Commands) -> LogTarget {
    match command {
        Commands::Nav(args) if !args.list => LogTarget::nav_log(),
        _ => LogTarget::Stderr,
    }
}

async fn run(cli: Cli) -> Result<()> {
    load_dotenv()?;
    let mut config = CatalogConfig::load();
    if let Some(index) = cli.index {
        config.search.index = index;
    }
    debug!(index = %config.search.index, backend = ?cli.backend, "configuration loaded");

    let format = cli.format;
    let command = match cli.command {
        Commands::Nav(args) => return nav::run_nav(args, &config),
        Commands::Completions(args) => return run_completions(args),
        command => command,
    };

    let catalog = catalog::open_catalog(cli.backend, &config, cli.seed.as_ref()).await?;

    match command {
        Commands::Upsert(args) => catalog::run_upsert(&catalog, args).await,
        Commands::Fetch(args) => catalog::run_fetch(&catalog, args, format).await,
        Commands::Search(args) => catalog::run_search(&catalog, args, &config, format).await,
        Commands::Delete(args) => catalog::run_delete(&catalog, args).await,
        Commands::Range(args) => catalog::run_range(&catalog, args, &config, format).await,
        Commands::List => catalog::run_list(&catalog, format).await,
        Commands::Info => catalog::run_info(&catalog, format).await,
        Commands::Reset(args) => catalog::run_reset(&catalog, args).await,
        Commands::Nav(_) | Commands::Completions(_) => Ok(()),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_flags_conflict() {
        let result = Cli::try_parse_from([
            "catalogctl", "search", "button", "--mode", "semantic", "--category", "input",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_interactive_nav_logs_to_file() {
        let nav = Cli::try_parse_from(["catalogctl", "--debug", "nav"]).unwrap();
        assert!(matches!(log_target(&nav.command), LogTarget::File(_)));

        let list = Cli::try_parse_from(["catalogctl", "nav", "--list"]).unwrap();
        assert_eq!(log_target(&list.command), LogTarget::Stderr);

        let search = Cli::try_parse_from(["catalogctl", "search", "button"]).unwrap();
        assert_eq!(log_target(&search.command), LogTarget::Stderr);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalogctl", "list", "--backend", "memory", "--index", "scratch", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.backend, Backend::Memory);
        assert_eq!(cli.index.as_deref(), Some("scratch"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::List));
    }
}
