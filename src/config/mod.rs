//! Configuration management
//!
//! Configuration is read from a YAML file; a missing file falls back to the
//! defaults, and missing optional values are filled in per field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset configuration
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: the defaults apply.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}

/// Location of the flat dataset files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Articles-and-tags file name
    #[serde(default = "default_articles_file")]
    pub articles_file: String,
    /// Users file name
    #[serde(default = "default_users_file")]
    pub users_file: String,
    /// Comments file name
    #[serde(default = "default_comments_file")]
    pub comments_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            articles_file: default_articles_file(),
            users_file: default_users_file(),
            comments_file: default_comments_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_articles_file() -> String {
    "articles.csv".to_string()
}

fn default_users_file() -> String {
    "users.csv".to_string()
}

fn default_comments_file() -> String {
    "comments.csv".to_string()
}
