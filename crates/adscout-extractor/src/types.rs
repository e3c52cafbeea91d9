//! Request and report types for extraction runs

use serde::Serialize;
use std::path::PathBuf;

/// Request to extract ads from one scraped page
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Raw scraped text
    pub text: String,

    /// Query label the ads should be relevant to
    pub query: String,
}

impl ExtractionRequest {
    /// Create a new request
    pub fn new(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query: query.into(),
        }
    }
}

/// Outcome of one chunk
#[derive(Debug, Clone, Serialize)]
pub struct ChunkOutcome {
    /// Chunk index
    pub chunk: usize,

    /// Records the parser recovered
    pub ads_found: usize,

    /// Records that were new to the record file
    pub ads_added: usize,
}

/// A chunk whose extraction call failed
#[derive(Debug, Clone, Serialize)]
pub struct ChunkFailure {
    /// Chunk index
    pub chunk: usize,

    /// Reason for failure
    pub reason: String,
}

/// Result of an extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Per-chunk counts for chunks whose call succeeded
    pub outcomes: Vec<ChunkOutcome>,

    /// Chunks that yielded nothing because the call failed
    pub failures: Vec<ChunkFailure>,

    /// Metadata about the run
    pub metadata: ExtractionMetadata,
}

impl ExtractionReport {
    /// Total records recovered across chunks, duplicates included
    pub fn ads_found(&self) -> usize {
        self.outcomes.iter().map(|o| o.ads_found).sum()
    }

    /// Total records added to the record file
    pub fn ads_added(&self) -> usize {
        self.outcomes.iter().map(|o| o.ads_added).sum()
    }

    /// Number of chunks processed
    pub fn chunks_total(&self) -> usize {
        self.outcomes.len() + self.failures.len()
    }
}

/// Metadata about an extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMetadata {
    /// Query label
    pub query: String,

    /// Name of the LLM model used
    pub model_name: String,

    /// Record file written to
    pub output_file: PathBuf,

    /// Records in the file before the run
    pub existing_ads: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
