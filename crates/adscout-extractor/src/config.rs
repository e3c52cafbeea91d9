//! Configuration for the Extractor

use crate::chunking::MIN_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Boundary markers the chunker prefers when splitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkStrategy {
    /// Split before `Library ID:`, then at blank lines, line breaks,
    /// sentence ends and spaces
    #[default]
    ByRecord,
    /// Split at blank lines, line breaks and spaces
    ByParagraph,
    /// Hard cuts only
    ByCharacter,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum chunk size (bytes)
    pub max_chunk_size: usize,

    /// Bytes repeated at the start of the next chunk
    pub chunk_overlap: usize,

    /// Text chunking strategy for large documents
    pub chunk_strategy: ChunkStrategy,

    /// Pause between consecutive extraction calls (milliseconds)
    pub cooldown_ms: u64,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Record file the merged ads are written to
    pub output_file: PathBuf,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Get the cool-down between calls as a Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size < MIN_CHUNK_SIZE {
            return Err(format!("max_chunk_size must be at least {}", MIN_CHUNK_SIZE));
        }
        if self.chunk_overlap * 2 >= self.max_chunk_size {
            return Err("chunk_overlap must be less than half of max_chunk_size".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.output_file.as_os_str().is_empty() {
            return Err("output_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_chunk_size: 3_000,
            chunk_overlap: 500,
            chunk_strategy: ChunkStrategy::ByRecord,
            cooldown_ms: 3_000,
            extraction_timeout_secs: 120,
            output_file: PathBuf::from("extracted_ads.json"),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: shorter timeouts, smaller chunks, shorter pauses
    pub fn aggressive() -> Self {
        Self {
            max_chunk_size: 1_500,
            chunk_overlap: 250,
            cooldown_ms: 1_000,
            extraction_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Lenient preset: longer timeouts and larger chunks for slow services
    pub fn lenient() -> Self {
        Self {
            max_chunk_size: 6_000,
            chunk_overlap: 800,
            cooldown_ms: 5_000,
            extraction_timeout_secs: 300,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
