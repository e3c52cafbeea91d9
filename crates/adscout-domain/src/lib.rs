//! AdScout Domain Layer
//!
//! This crate contains the core data model for AdScout. It holds no I/O and
//! defines the value types and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **AdRecord**: The raw extraction unit - one ad as recovered from a text chunk
//! - **RecordSet**: Deduplicated accumulation of AdRecords, persisted between runs
//! - **Lead**: An AdRecord enriched with scoring, pitch and review status
//! - **Library identifier**: The natural unique key of an ad on the Ad Library
//!
//! ## Architecture
//!
//! - Pure data and invariants only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lead;
pub mod record;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use lead::{DerivedMetrics, Lead, Level, Note};
pub use record::{AdRecord, RecordSet, CONTENT_PREVIEW_MAX_CHARS};
pub use status::LeadStatus;
