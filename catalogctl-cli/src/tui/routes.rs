//! Static navigation targets shown in the command palette

/// Palette section an entry is listed under, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NavGroup {
    Navigation,
    Settings,
}

impl NavGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            NavGroup::Navigation => "Navigation",
            NavGroup::Settings => "Settings",
        }
    }
}

/// A label mapped to a destination route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub route: &'static str,
    pub group: NavGroup,
    /// Displayed hint only; not bound to a key
    pub shortcut: Option<&'static str>,
}

const fn entry(
    label: &'static str,
    route: &'static str,
    group: NavGroup,
    shortcut: Option<&'static str>,
) -> NavEntry {
    NavEntry {
        label,
        route,
        group,
        shortcut,
    }
}

pub const NAV_ENTRIES: &[NavEntry] = &[
    entry("Home", "/", NavGroup::Navigation, Some("⌘H")),
    entry("Dashboard", "/dashboard", NavGroup::Navigation, Some("⌘D")),
    entry("Workshop", "/workshop", NavGroup::Navigation, None),
    entry("Testshop", "/testshop", NavGroup::Navigation, None),
    entry("Embedded", "/embedded", NavGroup::Navigation, None),
    entry("Metadata", "/metadata", NavGroup::Navigation, None),
    entry("Indexed", "/indexed", NavGroup::Navigation, None),
    entry("Workflow", "/workflow", NavGroup::Navigation, None),
    entry("Showroom", "/showroom", NavGroup::Navigation, None),
    entry("Settings", "/settings", NavGroup::Settings, Some("⌘S")),
    entry("Profile", "/profile", NavGroup::Settings, Some("⌘P")),
];

/// Where the landing page's single link goes
pub const LANDING_LINK: &str = "/dashboard";

/// Entry registered for a route, if any
pub fn find(route: &str) -> Option<&'static NavEntry> {
    NAV_ENTRIES.iter().find(|e| e.route == route)
}

/// Page title for a route
pub fn page_title(route: &str) -> &'static str {
    find(route).map(|e| e.label).unwrap_or("Not Found")
}
