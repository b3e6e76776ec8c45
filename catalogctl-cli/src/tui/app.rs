//! Shell state: current location and the command palette

use tracing::debug;

use super::routes::{self, NavEntry, NAV_ENTRIES};
use super::search::{fuzzy_filter, PaletteMatch};

/// Command palette state. Closed by default.
#[derive(Debug)]
pub struct Palette {
    open: bool,
    /// Filter text typed into the palette input
    query: String,
    /// Index into `matches`
    selected: usize,
    matches: Vec<PaletteMatch>,
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self {
            open: false,
            query: String::new(),
            selected: 0,
            matches: Vec::new(),
        };
        palette.refilter();
        palette
    }
}

impl Palette {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn matches(&self) -> &[PaletteMatch] {
        &self.matches
    }

    /// Open with a fresh filter
    pub fn open(&mut self) {
        if !self.open {
            self.reset_filter();
        }
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn backspace(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    /// Move selection down (wraps)
    pub fn select_next(&mut self) {
        if !self.matches.is_empty() {
            self.selected = (self.selected + 1) % self.matches.len();
        }
    }

    /// Move selection up (wraps)
    pub fn select_prev(&mut self) {
        if !self.matches.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.matches.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&'static NavEntry> {
        self.matches.get(self.selected).map(|m| m.entry)
    }

    /// Matches are grouped (stable, so score order holds within a group)
    /// so that selection order follows the rendered order
    fn refilter(&mut self) {
        self.matches = fuzzy_filter(&self.query, NAV_ENTRIES);
        self.matches.sort_by_key(|m| m.entry.group);
        self.selected = 0;
    }

    fn reset_filter(&mut self) {
        self.query.clear();
        self.refilter();
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    pub palette: Palette,
    /// Route currently displayed
    location: String,
    /// Transient message for the status bar
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(start_route: impl Into<String>) -> Self {
        Self {
            palette: Palette::default(),
            location: start_route.into(),
            status: None,
            should_quit: false,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_landing(&self) -> bool {
        self.location == "/"
    }

    /// Replace the current location; the page is rebuilt from the route
    pub fn navigate(&mut self, route: &str) {
        debug!(from = %self.location, to = %route, "navigate");
        self.location = route.to_string();
        self.status = Some(format!("→ {} ({})", routes::page_title(route), route));
    }

    /// Navigate to the highlighted palette entry and close the palette
    pub fn select_palette_entry(&mut self) -> Option<&'static str> {
        let entry = self.palette.selected_entry()?;
        self.navigate(entry.route);
        self.palette.close();
        Some(entry.route)
    }
}
