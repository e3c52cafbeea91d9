//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction run failed
    #[error("Extraction error: {0}")]
    Extractor(#[from] adscout_extractor::ExtractorError),

    /// Scoring setup failed
    #[error("Scoring error: {0}")]
    Scorer(#[from] adscout_scorer::ScorerError),

    /// Lead database error
    #[error("Store error: {0}")]
    Store(#[from] adscout_store::StoreError),

    /// Generative service could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] adscout_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No lead with this library id
    #[error("Lead not found: {0}")]
    NotFound(String),
}
