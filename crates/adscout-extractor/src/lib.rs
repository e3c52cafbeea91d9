//! AdScout Extractor
//!
//! Turns raw scraped Ad Library text into a deduplicated record file.
//!
//! # Architecture
//!
//! ```text
//! Text → cleanup → Chunker → [LLM → Parser] per chunk → RecordStore
//! ```
//!
//! # Key Features
//!
//! - **Boundary-aware chunking**: overlapping chunks that prefer to split
//!   between ads
//! - **Rate-limited calls**: a cool-down between consecutive LLM calls and a
//!   timeout on each
//! - **Tolerant parsing**: a chain of strategies for fenced, embedded or
//!   partial JSON
//! - **Crash-safe merging**: the record file is replaced whole after each
//!   chunk, so earlier chunks survive a failed run
//!
//! # Example Usage
//!
//! ```no_run
//! use adscout_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use adscout_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"ads": []}"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let request = ExtractionRequest::new("Library ID: 123 ...", "minifan");
//! let report = extractor.extract(request).await?;
//!
//! println!("Added: {} ads", report.ads_added());
//! println!("Failed chunks: {}", report.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod chunking;
mod cleanup;
mod client;
mod parser;
mod record_store;
mod extractor;


pub use error::ExtractorError;
pub use config::{ExtractorConfig, ChunkStrategy};
pub use types::{
    ExtractionRequest, ExtractionReport, ExtractionMetadata, ChunkOutcome, ChunkFailure,
};
pub use chunking::{Chunk, Chunks, TextChunker, MIN_CHUNK_SIZE};
pub use cleanup::clean_scraped_text;
pub use client::ExtractionClient;
pub use parser::{parse_ads, AdsPattern, BraceSpan, FencedBlock, ParseStrategy, ResponseParser};
pub use prompt::PromptBuilder;
pub use record_store::RecordStore;
pub use extractor::Extractor;
