use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Environment variable holding the search service REST URL
pub const ENV_URL: &str = "UPSTASH_SEARCH_REST_URL";
/// Environment variable holding the search service bearer token
pub const ENV_TOKEN: &str = "UPSTASH_SEARCH_REST_TOKEN";
/// Environment variable overriding the index name
pub const ENV_INDEX: &str = "CATALOGCTL_INDEX";

/// Load environment variables from .env files in multiple locations
///
/// Priority order (highest to lowest):
/// 1. Current directory .env
/// 2. ~/.catalogctl/.env
/// 3. Environment variables already set
pub fn load_dotenv() -> Result<()> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(_) => {
                    loaded_from.push(format!("~/.catalogctl/.env ({})", env_file.display()));
                    debug!("Loaded .env from ~/.catalogctl: {}", env_file.display());
                }
                Err(e) => {
                    debug!("Failed to load ~/.catalogctl/.env: {}", e);
                }
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.catalogctl)");
    } else {
        info!("Loaded configuration from: {}", loaded_from.join(", "));
    }

    Ok(())
}

/// Get the catalogctl config directory path (~/.catalogctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".catalogctl"))
}

// ============================================================================
// TOML Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub nav: NavConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// REST endpoint of the hosted search database
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token; prefer the environment over committing this to a file
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Transport timeout handed to the HTTP client (none by default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            index: default_index(),
            default_limit: default_limit(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavConfig {
    /// Route the navigation shell opens on
    #[serde(default = "default_start_route")]
    pub start_route: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
        }
    }
}

fn default_index() -> String {
    "components".to_string()
}

fn default_limit() -> usize {
    10
}

fn default_start_route() -> String {
    "/".to_string()
}

/// One TOML file as written; every field is optional so unset keys fall through
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    search: SearchFile,
    #[serde(default)]
    nav: NavFile,
}

#[derive(Debug, Default, Deserialize)]
struct SearchFile {
    url: Option<String>,
    token: Option<String>,
    index: Option<String>,
    default_limit: Option<usize>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct NavFile {
    start_route: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::parse(path) {
            Ok(layer) => Some(layer),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn parse(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|source| CatalogError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_to(self, config: &mut CatalogConfig) {
        let SearchFile {
            url,
            token,
            index,
            default_limit,
            timeout_secs,
        } = self.search;
        let search = &mut config.search;

        if url.is_some() {
            search.url = url;
        }
        if token.is_some() {
            search.token = token;
        }
        if let Some(index) = index {
            search.index = index;
        }
        if let Some(limit) = default_limit {
            search.default_limit = limit;
        }
        if timeout_secs.is_some() {
            search.timeout_secs = timeout_secs;
        }
        if let Some(route) = self.nav.start_route {
            config.nav.start_route = route;
        }
    }
}

impl CatalogConfig {
    /// Load config from TOML files, then apply environment overrides
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment (UPSTASH_SEARCH_REST_URL, UPSTASH_SEARCH_REST_TOKEN, CATALOGCTL_INDEX)
    /// 2. ./catalogctl.toml (project-specific)
    /// 3. ~/.catalogctl/config.toml (user defaults)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        let global = config_dir().map(|d| d.join("config.toml"));
        let mut config = Self::load_from(global.as_deref(), Path::new("catalogctl.toml"));
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load from explicit file locations; unreadable or invalid files are skipped.
    /// Each file only overrides the fields it sets.
    pub fn load_from(global: Option<&Path>, local: &Path) -> Self {
        let mut config = CatalogConfig::default();

        if let Some(global) = global {
            if let Some(layer) = ConfigFile::read(global) {
                debug!("Loaded global config from {}", global.display());
                layer.apply_to(&mut config);
            }
        }

        if let Some(layer) = ConfigFile::read(local) {
            debug!("Loaded local config from {}", local.display());
            layer.apply_to(&mut config);
        }

        config
    }

    /// Parse one TOML file strictly, on top of the built-in defaults
    pub fn parse_file(path: &Path) -> Result<Self> {
        let mut config = CatalogConfig::default();
        ConfigFile::parse(path)?.apply_to(&mut config);
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.search.url = Some(url);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.search.token = Some(token);
        }
        if let Some(index) = lookup(ENV_INDEX).filter(|v| !v.is_empty()) {
            self.search.index = index;
        }
    }
}

impl SearchConfig {
    /// URL and token, or a configuration error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CatalogError::config(format!("{} not set", ENV_URL)))?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::config(format!("{} not set", ENV_TOKEN)))?;
        Ok((url, token))
    }
}
