//! `catalogctl nav`: the terminal navigation shell

use anyhow::Result;
use catalogctl_core::CatalogConfig;
use clap::Args;
use tracing::info;

use crate::tui::{self, routes::NAV_ENTRIES};

#[derive(Args, Debug)]
pub struct NavArgs {
    /// Print the navigation targets instead of starting the shell
    #[arg(long)]
    pub list: bool,

    /// Route to open on start (default from config, "/")
    #[arg(long, value_name = "ROUTE")]
    pub route: Option<String>,
}

/// Route table as aligned text, grouped like the palette
pub fn format_routes() -> String {
    let mut output = String::new();
    let mut current_group = None;

    for entry in NAV_ENTRIES {
        if current_group != Some(entry.group) {
            if current_group.is_some() {
                output.push('\n');
            }
            current_group = Some(entry.group);
            output.push_str(&format!("{}:\n", entry.group.heading()));
        }
        output.push_str(&format!(
            "  {:<12}{:<14}{}\n",
            entry.label,
            entry.route,
            entry.shortcut.unwrap_or("")
        ));
    }

    output
}

pub fn run_nav(args: NavArgs, config: &CatalogConfig) -> Result<()> {
    if args.list {
        print!("{}", format_routes());
        return Ok(());
    }

    let start = args.route.as_deref().unwrap_or(&config.nav.start_route);
    let last = tui::run(start)?;
    info!(location = %last, "navigation shell closed");
    Ok(())
}
