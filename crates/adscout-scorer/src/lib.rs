//! AdScout Scorer
//!
//! Turns extracted ad records into scored, reviewable leads.
//!
//! The scorer provides:
//! - Record validation (advertiser, library id, page link)
//! - Service recommendation from page analysis or advertiser name
//! - Website probing for security and maintenance services
//! - Derived metrics from keyword signals
//! - Bengali outreach pitches with WhatsApp deep links
//!
//! # Examples
//!
//! ```no_run
//! use adscout_scorer::{EnrichContext, Enricher, HttpProbe, ScoringConfig};
//! use adscout_domain::AdRecord;
//!
//! # async fn run(record: AdRecord) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScoringConfig::default();
//! let probe = HttpProbe::new(&config.probe)?;
//! let enricher = Enricher::new(probe, config)?;
//!
//! let lead = enricher.enrich(&record, &EnrichContext::default()).await?;
//! println!("{} -> {}", lead.advertiser, lead.service);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analysis;
mod config;
mod enricher;
mod error;
mod metrics;
mod pitch;
mod probe;
mod service;

pub use analysis::{parse_analysis, PageAnalysis, PageAnalyzer};
pub use config::{
    DmWeights, IntensityThresholds, OrderThresholds, OrderTier, ProbeConfig, RiskWeights,
    ScoringConfig,
};
pub use enricher::{EnrichContext, Enricher, EnrichmentReport, Rejection, SOURCE_TAG};
pub use error::{ScorerError, ValidationError};
pub use metrics::{estimate_metrics, MetricInputs};
pub use pitch::{clean_phone, draft_pitch, outreach_link, pitch_and_link};
pub use probe::{
    normalize_website, HttpProbe, SiteIssues, SiteReport, WebsiteProbe, FB_ONLY_MESSAGE,
    HEALTHY_MESSAGE, NOT_PROBED_MESSAGE,
};
pub use service::{infer_service_from_name, needs_website_probe, resolve_service};
