//! Core extraction pipeline

use crate::chunking::TextChunker;
use crate::cleanup::clean_scraped_text;
use crate::client::ExtractionClient;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::ResponseParser;
use crate::prompt::PromptBuilder;
use crate::record_store::RecordStore;
use crate::types::{
    ChunkFailure, ChunkOutcome, ExtractionMetadata, ExtractionReport, ExtractionRequest,
};
use adscout_domain::traits::LlmProvider;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns scraped pages into deduplicated ad records
///
/// Chunks are processed strictly one after another: each chunk's call,
/// parse and merge finish before the next chunk starts.
pub struct Extractor<L: LlmProvider> {
    client: ExtractionClient<L>,
    store: RecordStore,
    parser: ResponseParser,
    config: ExtractorConfig,
}

impl<L: LlmProvider> Extractor<L> {
    /// Create a new Extractor writing to `config.output_file`
    pub fn new(llm: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            client: ExtractionClient::new(llm, config.cooldown(), config.extraction_timeout()),
            store: RecordStore::new(config.output_file.clone()),
            parser: ResponseParser::default(),
            config,
        })
    }

    /// The record file this extractor merges into
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Extract ads from a scraped page and merge them into the record file
    ///
    /// A failed extraction call only costs its chunk. A failed write stops
    /// the run with [`ExtractorError::Merge`]; records merged by earlier
    /// chunks stay on disk.
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionReport, ExtractorError> {
        let started = Instant::now();
        let text = clean_scraped_text(&request.text);
        let chunker = TextChunker::new(
            self.config.chunk_strategy,
            self.config.max_chunk_size,
            self.config.chunk_overlap,
        )?;

        let chunk_count = chunker.chunks(&text).count();
        let existing_ads = self.store.load().len();
        info!(
            query = %request.query,
            text_len = text.len(),
            chunks = chunk_count,
            existing_ads,
            "Starting extraction"
        );

        let mut outcomes = Vec::with_capacity(chunk_count);
        let mut failures = Vec::new();
        let mut added_so_far = 0;

        for chunk in chunker.chunks(&text) {
            debug!(
                chunk = chunk.index + 1,
                of = chunk_count,
                offset = chunk.start,
                len = chunk.text.len(),
                "Processing chunk"
            );

            let prompt = PromptBuilder::new(chunk.text, &request.query).build();
            let response = match self.client.complete(&prompt).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(chunk = chunk.index, error = %e, "Extraction call failed, skipping chunk");
                    failures.push(ChunkFailure {
                        chunk: chunk.index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let ads = self.parser.parse(&response);
            let ads_found = ads.len();
            let ads_added = if ads.is_empty() {
                0
            } else {
                self.store.merge(ads).map_err(|e| ExtractorError::Merge {
                    chunk: chunk.index,
                    added_so_far,
                    source: Box::new(e),
                })?
            };
            added_so_far += ads_added;

            debug!(chunk = chunk.index, ads_found, ads_added, "Chunk done");
            outcomes.push(ChunkOutcome {
                chunk: chunk.index,
                ads_found,
                ads_added,
            });
        }

        let report = ExtractionReport {
            outcomes,
            failures,
            metadata: ExtractionMetadata {
                query: request.query,
                model_name: self.client.model_name().to_string(),
                output_file: self.store.path().to_path_buf(),
                existing_ads,
                processing_time_ms: started.elapsed().as_millis() as u64,
            },
        };

        info!(
            chunks = report.chunks_total(),
            failed = report.failures.len(),
            found = report.ads_found(),
            added = report.ads_added(),
            "Extraction complete"
        );

        Ok(report)
    }
}
