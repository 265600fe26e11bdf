//! Configuration loading and types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use studyhub_core::PageNumberPagination;
use studyhub_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Top-level configuration for the studyhub daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Daemon server settings
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// List endpoint pagination
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Daemon server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://studyhub.db".to_string()
}

/// Pagination settings for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// When false, list endpoints return every record without paging metadata
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Page size when the request does not set `page_size`
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Upper bound for a requested `page_size`
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u64 {
    MAX_PAGE_SIZE
}

impl PaginationConfig {
    /// Pagination policy, or `None` when pagination is disabled
    #[must_use]
    pub fn strategy(&self) -> Option<PageNumberPagination> {
        self.enabled
            .then(|| PageNumberPagination::new(self.page_size, self.max_page_size))
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find the configuration file to use, if any
    ///
    /// `STUDYHUB_CONFIG` wins; otherwise the first existing common path.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STUDYHUB_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let mut paths = vec![
            PathBuf::from("studyhub.toml"),
            PathBuf::from("/etc/studyhub/studyhub.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("studyhub/studyhub.toml"));
        }

        paths.into_iter().find(|path| path.exists())
    }
}
