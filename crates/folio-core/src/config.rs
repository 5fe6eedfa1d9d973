//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    content::Mode,
    error::{CoreError, Result},
};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Public origin of the site (e.g., "https://example.com").
    ///
    /// When unset, the origin is taken from each request.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Site description for listings.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Where posts and standalone pages live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root content directory.
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,

    /// Name of the standalone page listed in the sitemap as `now`.
    #[serde(default = "default_now_page")]
    pub now_page: String,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve drafts and other development-only content.
    #[serde(default)]
    pub dev: bool,
}

// Default value functions
fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_now_page() -> String {
    "now".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            now_page: default_now_page(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dev: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, letting `FOLIO__SECTION__KEY` variables override the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if let Some(base_url) = &self.site.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(CoreError::config(
                    "site.base_url must start with http:// or https://",
                ));
            }

            if base_url.ends_with('/') {
                tracing::warn!("site.base_url should not have a trailing slash");
            }
        }

        if self.content.now_page.is_empty() {
            return Err(CoreError::config("content.now_page cannot be empty"));
        }

        Ok(())
    }

    /// Configured origin without a trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.site
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
    }

    /// Data-access mode selected by `server.dev`.
    pub fn mode(&self) -> Mode {
        if self.server.dev {
            Mode::Development
        } else {
            Mode::Production
        }
    }
}
