//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use adscout_extractor::ExtractorConfig;
use adscout_scorer::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative service connection
    #[serde(default)]
    pub llm: LlmSettings,

    /// Where leads and exports live
    #[serde(default)]
    pub storage: StorageSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Chunking, pacing and record file for extraction runs
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Thresholds used when scoring leads
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Generative service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama-compatible endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite lead database
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// CSV export regenerated after each enrichment
    #[serde(default = "default_csv")]
    pub csv_file: PathBuf,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path (`~/.adscout/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".adscout").join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check the nested extractor and scoring configurations.
    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("extractor: {}", e)))?;
        self.scoring
            .validate()
            .map_err(|e| CliError::Config(format!("scoring: {}", e)))?;
        if self.llm.endpoint.trim().is_empty() || self.llm.model.trim().is_empty() {
            return Err(CliError::Config("llm endpoint and model must be set".into()));
        }
        Ok(())
    }

    /// Apply command-line and environment overrides.
    pub fn apply_overrides(
        &mut self,
        database: Option<PathBuf>,
        endpoint: Option<String>,
        model: Option<String>,
    ) {
        if let Some(database) = database {
            self.storage.database = database;
        }
        if let Some(endpoint) = endpoint {
            self.llm.endpoint = endpoint;
        }
        if let Some(model) = model {
            self.llm.model = model;
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database: default_database(),
            csv_file: default_csv(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_endpoint() -> String {
    adscout_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("adscout.db")
}

fn default_csv() -> PathBuf {
    PathBuf::from("leads.csv")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.storage.database, PathBuf::from("adscout.db"));
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[llm]\nmodel = \"mistral\"\n\n[extractor]\nmax_chunk_size = 4000\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.extractor.max_chunk_size, 4000);
        assert_eq!(config.extractor.chunk_overlap, 500);
    }

    #[test]
    fn test_invalid_nested_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\nmax_chunk_size = 100\nchunk_overlap = 80\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.storage.csv_file = PathBuf::from("out.csv");
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.storage.csv_file, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some(PathBuf::from("x.db")), None, Some("qwen".into()));
        assert_eq!(config.storage.database, PathBuf::from("x.db"));
        assert_eq!(config.llm.model, "qwen");
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
    }
}
