//! Configuration loading and management
//!
//! Handles parsing of `glasstask.toml` configuration files. Configuration
//! is a static set of connection parameters for the sync service plus a
//! client identifier (and local profile) for the identity provider.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sync service connection parameters
    #[serde(default)]
    pub service: ServiceConfig,

    /// Identity provider configuration
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

/// Connection parameters for the remote document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Project identifier on the sync service
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// API key issued by the sync service
    #[serde(default)]
    pub api_key: String,

    /// Hostname used for the sign-in flow
    #[serde(default = "default_auth_domain")]
    pub auth_domain: String,
}

fn default_project_id() -> String {
    "glasstask-local".to_string()
}

fn default_auth_domain() -> String {
    "localhost".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            api_key: String::new(),
            auth_domain: default_auth_domain(),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// OAuth client identifier registered with the provider
    #[serde(default)]
    pub client_id: String,

    /// Display name used by the local development identity
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Email reported by the local development identity
    #[serde(default)]
    pub email: Option<String>,

    /// Avatar URL reported by the local development identity
    #[serde(default)]
    pub photo_url: Option<String>,
}

fn default_display_name() -> String {
    "Local User".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            display_name: default_display_name(),
            email: None,
            photo_url: None,
        }
    }
}

impl Config {
    /// Load configuration from a `glasstask.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, the platform config
    /// directory, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);
        match candidate {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_else(|err| {
                tracing::warn!("ignoring config at {}: {err}", path.display());
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform config location, e.g. `~/.config/glasstask/glasstask.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "glasstask")
            .map(|dirs| dirs.config_dir().join("glasstask.toml"))
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.service.project_id.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "service.project_id cannot be empty".to_string(),
            ));
        }
        if self.identity.display_name.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "identity.display_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
