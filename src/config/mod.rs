//! Library configuration
//!
//! TOML-backed settings for storage location and search behavior. Search
//! weight validation is advisory only: the scoring math tolerates any real
//! weights, so suspicious values are logged rather than rejected.

use crate::error::{AdvisorError, Result};
use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub knowledge_file: String,
}

impl AdvisorConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AdvisorError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AdvisorError::Io {
            source: e,
            context: format!("Failed to read config file: {}", path.display()),
        })?;
        let config: AdvisorConfig = toml::from_str(&content)?;
        config.log_weight_advisories();
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AdvisorError::Io {
                source: e,
                context: format!("Failed to create config directory: {}", parent.display()),
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| AdvisorError::Io {
            source: e,
            context: format!("Failed to write config file: {}", path.display()),
        })?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine config directory".to_string()))?;
        Ok(config_dir.join("advisor-kb").join("config.toml"))
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine home directory".to_string()))?;
        Ok(home_dir.join(".advisor-kb"))
    }

    /// Full path of the knowledge base file
    pub fn knowledge_base_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.knowledge_file)
    }

    fn log_weight_advisories(&self) {
        let total = self.search.keyword_weight + self.search.semantic_weight;
        if (total - 1.0).abs() > 0.01 {
            tracing::warn!(
                total_weight = total,
                "search weights do not sum to 1.0; hybrid scores are rescaled uniformly"
            );
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("~/.advisor-kb"),
                knowledge_file: "knowledge_base.json".to_string(),
            },
            search: SearchConfig::default(),
        }
    }
}
