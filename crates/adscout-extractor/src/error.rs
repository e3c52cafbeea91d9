//! Error types for the Extractor

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Generative service error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction call exceeded its time budget
    #[error("Extraction timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Record file could not be read or written
    #[error("Record file error: {0}")]
    Io(#[from] std::io::Error),

    /// Record set could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing merged records failed; earlier chunks are already on disk
    #[error("Merge failed at chunk {chunk} ({added_so_far} records already saved): {source}")]
    Merge {
        /// Index of the chunk whose records could not be saved
        chunk: usize,
        /// Records persisted by earlier chunks of the same run
        added_so_far: usize,
        /// Underlying write failure
        #[source]
        source: Box<ExtractorError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether this error only affects a single chunk
    pub fn is_chunk_local(&self) -> bool {
        matches!(self, ExtractorError::Llm(_) | ExtractorError::Timeout(_))
    }
}
