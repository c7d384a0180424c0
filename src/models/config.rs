// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.listing_url.trim().is_empty() {
            return Err(AppError::config("crawler.listing_url is empty"));
        }
        if !self.crawler.detail_url_template.contains("{id}") {
            return Err(AppError::config(
                "crawler.detail_url_template must contain an {id} placeholder",
            ));
        }
        if self.crawler.fetch_interval_secs == 0 {
            return Err(AppError::config("crawler.fetch_interval_secs must be > 0"));
        }
        if self.crawler.max_items_per_cycle == 0 {
            return Err(AppError::config("crawler.max_items_per_cycle must be > 0"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.database.url.trim().is_empty() {
            return Err(AppError::config("database.url is empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// URL of the news listing page
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Detail page URL template with an `{id}` placeholder
    #[serde(default = "defaults::detail_url_template")]
    pub detail_url_template: String,

    /// Seconds between scrape cycles
    #[serde(default = "defaults::fetch_interval")]
    pub fetch_interval_secs: u64,

    /// Maximum candidate ids collected from the listing per cycle
    #[serde(default = "defaults::max_items")]
    pub max_items_per_cycle: usize,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            detail_url_template: defaults::detail_url_template(),
            fetch_interval_secs: defaults::fetch_interval(),
            max_items_per_cycle: defaults::max_items(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string
    #[serde(default = "defaults::database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::database_url(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: debug, info, warn, error
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn listing_url() -> String {
        "https://news.example.com/news/".to_string()
    }

    pub fn detail_url_template() -> String {
        "https://news.example.com/news/{id}.html".to_string()
    }

    pub fn fetch_interval() -> u64 {
        300
    }

    pub fn max_items() -> usize {
        20
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn user_agent() -> String {
        format!("newscrawl/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn database_url() -> String {
        "sqlite://data/news.db?mode=rwc".to_string()
    }

    pub fn log_level() -> String {
        "info".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_template() {
        let mut config = Config::default();
        config.crawler.detail_url_template = "https://news.example.com/news.html".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.crawler.fetch_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[crawler]
listing_url = "https://site.test/news/"
detail_url_template = "https://site.test/news/{{id}}.html"
fetch_interval_secs = 60
max_items_per_cycle = 5

[database]
url = "sqlite::memory:"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.crawler.listing_url, "https://site.test/news/");
        assert_eq!(config.crawler.fetch_interval_secs, 60);
        assert_eq!(config.crawler.max_items_per_cycle, 5);
        // Unset sections fall back to defaults
        assert_eq!(config.crawler.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }
}
