//! Terminal navigation shell
//!
//! A header with a read-only search field, a page body for the current
//! route, and a command palette (Ctrl+K / Cmd+K) listing static targets.

pub mod app;
pub mod event;
pub mod routes;
pub mod search;
pub mod terminal;
pub mod ui;

pub use terminal::run;
