//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (e.g. "127.0.0.1:3000")
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Media storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Root directory for stored images
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("images")
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the file named by `FLATBOARD_CONFIG`, or fall back to defaults
    pub fn load() -> Result<Self> {
        match std::env::var("FLATBOARD_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.media.root, PathBuf::from("images"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.server.bind, config.server.bind);
        assert_eq!(parsed.media.root, config.media.root);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed = AppConfig::from_yaml_str("server:\n  bind: \"0.0.0.0:8080\"\n").unwrap();
        assert_eq!(parsed.server.bind, "0.0.0.0:8080");
        assert_eq!(parsed.media.root, PathBuf::from("images"));
    }
}
