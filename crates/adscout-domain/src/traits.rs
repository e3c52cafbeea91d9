//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Lead, LeadStatus};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Trait for the external text-generation service
///
/// Implemented by the infrastructure layer (adscout-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a free-form text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}

/// Trait for persisting and reviewing leads
///
/// Implemented by the infrastructure layer (adscout-store)
pub trait LeadStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Insert or refresh a lead keyed by its library identifier
    fn upsert(&mut self, lead: &Lead) -> Result<UpsertOutcome, Self::Error>;

    /// Upsert many leads; a failing lead is counted and skipped
    fn bulk_upsert(&mut self, leads: &[Lead]) -> BulkUpsertSummary {
        let mut summary = BulkUpsertSummary::default();
        for lead in leads {
            match self.upsert(lead) {
                Ok(outcome) => {
                    summary.saved += outcome.saved;
                    summary.updated += outcome.updated;
                }
                Err(e) => {
                    summary.skipped += 1;
                    summary.errors.push(format!("{}: {}", lead.library_id, e));
                }
            }
        }
        summary
    }

    /// Get a lead by library identifier
    fn get_lead(&self, library_id: &str) -> Result<Option<Lead>, Self::Error>;

    /// Leads worth contacting first
    ///
    /// Probability at or above `min_probability`, with a contact, not yet a
    /// client; highest probability first.
    fn get_high_priority(&self, min_probability: u8, limit: usize)
        -> Result<Vec<Lead>, Self::Error>;

    /// Change a lead's status, optionally appending a note in the same write
    ///
    /// Returns `false` if no lead has this identifier.
    fn update_status(
        &mut self,
        library_id: &str,
        status: LeadStatus,
        note: Option<&str>,
    ) -> Result<bool, Self::Error>;

    /// Case-insensitive substring search over advertiser and contact
    fn search(&self, query: &str) -> Result<Vec<Lead>, Self::Error>;

    /// Lead counts per status
    fn get_stats(&self) -> Result<LeadStats, Self::Error>;
}

/// Result of a single upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// 1 if a new lead was inserted
    pub saved: usize,

    /// 1 if an existing lead was refreshed
    pub updated: usize,
}

/// Totals of a bulk upsert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkUpsertSummary {
    /// Newly inserted leads
    pub saved: usize,

    /// Refreshed leads
    pub updated: usize,

    /// Leads that failed to persist
    pub skipped: usize,

    /// One message per skipped lead
    pub errors: Vec<String>,
}

/// Lead counts grouped by status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadStats {
    /// Count per status; statuses without leads are absent
    pub by_status: BTreeMap<LeadStatus, usize>,

    /// Total number of leads
    pub total: usize,
}
