//! Output helpers for the catalogctl CLI
//!
//! Progress spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `CATALOGCTL_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use catalogctl_core::{ComponentDocument, IndexInfo, RangePage};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Global quiet mode state
static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Initialize quiet mode from flags and environment. Call once at startup.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("CATALOGCTL_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Create a spinner that respects quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Clear a spinner if one was shown
pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable markdown
    #[default]
    Text,
    /// JSON for machine consumption
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Format documents as a markdown list
pub fn format_documents(heading: &str, documents: &[ComponentDocument]) -> String {
    let mut output = format!("## {} ({})\n\n", heading, documents.len());

    for (i, doc) in documents.iter().enumerate() {
        let content = &doc.content;
        output.push_str(&format!("{}. **{}** `{}`", i + 1, content.title, doc.id));
        if let Some(score) = doc.score {
            output.push_str(&format!(" ({}% match)", (score * 100.0).round() as i64));
        }
        output.push('\n');
        output.push_str(&format!(
            "   {} / {}\n",
            content.category, content.subcategory
        ));
        if !content.description.is_empty() {
            let preview: String = content.description.chars().take(200).collect();
            output.push_str(&format!("   {}\n", preview));
        }
        if !content.tags.is_empty() {
            let tags: Vec<&str> = content.tags.iter().map(String::as_str).collect();
            output.push_str(&format!("   Tags: {}\n", tags.join(", ")));
        }
        if let Some(meta) = &doc.metadata {
            output.push_str(&format!("   File: {} ({})\n", meta.file, meta.difficulty));
        }
        output.push('\n');
    }

    output
}

pub fn print_documents(
    heading: &str,
    documents: &[ComponentDocument],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(documents),
        OutputFormat::Text => {
            print!("{}", format_documents(heading, documents));
            Ok(())
        }
    }
}

pub fn print_page(page: &RangePage, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Text => {
            print!("{}", format_documents("Components", &page.documents));
            if page.is_last() {
                println!("(end of index)");
            } else {
                println!("Next cursor: {}", page.next_cursor);
            }
            Ok(())
        }
    }
}

pub fn print_info(info: &IndexInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(info),
        OutputFormat::Text => {
            println!("## Search Database\n");
            println!("Documents: {}", info.document_count);
            println!("Pending:   {}", info.pending_document_count);
            println!("Disk size: {} bytes", info.disk_size);
            if !info.indexes.is_empty() {
                println!("\n### Indexes\n");
                for (name, stats) in &info.indexes {
                    println!(
                        "- {}: {} documents ({} pending)",
                        name, stats.document_count, stats.pending_document_count
                    );
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogctl_core::{Category, ComponentContent};

    #[test]
    fn test_format_documents() {
        let doc = ComponentDocument {
            id: "btn-1".into(),
            content: ComponentContent {
                title: "Button".into(),
                description: "Clickable".into(),
                category: Category::Input,
                subcategory: "action".into(),
                tags: Default::default(),
            },
            metadata: None,
            score: Some(0.876),
        };
        let output = format_documents("Results", &[doc]);
        assert!(output.starts_with("## Results (1)"));
        assert!(output.contains("**Button** `btn-1` (88% match)"));
        assert!(output.contains("input / action"));
        assert!(!output.contains("Tags:"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_documents("Results", &[]), "## Results (0)\n\n");
    }
}
