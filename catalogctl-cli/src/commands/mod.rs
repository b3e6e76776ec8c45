//! Subcommand implementations

pub mod catalog;
pub mod nav;
