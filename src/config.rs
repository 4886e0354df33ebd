//! Persisted client configuration: server URL, bearer token, UI preferences

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the Agenda service
    #[serde(default = "default_url")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token issued by the service; attached to every request
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Page size used when listing contacts without an explicit --size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_page_size() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Default config path
    pub fn default_path() -> Result<PathBuf> {
        // Check environment variable first
        if let Ok(env_path) = std::env::var("AGENDA_CONFIG") {
            return Ok(PathBuf::from(env_path));
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from default path; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        // Add helpful comments
        let with_comments = format!(
            "# agenda configuration\n\n\
             {}\n\
             # Store a token with: agenda login --token <token>\n",
            content
        );

        std::fs::write(path, with_comments).context("Failed to write config file")?;

        Ok(())
    }
}

/// Drop the stored bearer token, keeping everything else. Used when the
/// service answers 401.
pub fn clear_token(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let mut config = Config::load_from(path)?;
    if config.auth.token.is_some() {
        config.auth.token = None;
        config.save_to(path)?;
    }
    Ok(())
}
