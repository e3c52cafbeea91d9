//! Turning raw ad records into scored leads

use crate::analysis::PageAnalysis;
use crate::config::ScoringConfig;
use crate::error::{ScorerError, ValidationError};
use crate::metrics::{estimate_metrics, MetricInputs};
use crate::pitch::pitch_and_link;
use crate::probe::{normalize_website, SiteIssues, WebsiteProbe};
use crate::service::{needs_website_probe, resolve_service};
use adscout_domain::{AdRecord, Lead};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Tag put on every lead found through the Ad Library
pub const SOURCE_TAG: &str = "fb-ad";

/// Facts about a record that come from outside the record itself
#[derive(Debug, Clone, Default)]
pub struct EnrichContext {
    /// Ads by the same page in this batch
    pub repeat_ads: usize,

    /// Page follower count, when known
    pub followers: Option<u64>,

    /// Sales-fit analysis of the page, when one was run
    pub analysis: Option<PageAnalysis>,
}

/// A record that could not become a lead
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Library identifier, if the record had one
    pub library_id: Option<String>,

    /// Advertiser, if the record had one
    pub advertiser: Option<String>,

    /// Why the record was rejected
    pub reason: ValidationError,
}

/// Result of enriching a batch
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    /// Leads ready to store
    pub leads: Vec<Lead>,

    /// Records rejected by validation
    pub rejected: Vec<Rejection>,

    /// Records skipped as repeats within the batch
    pub duplicates: usize,
}

/// Validated required fields of a record
struct Required<'a> {
    advertiser: &'a str,
    library_id: &'a str,
    facebook_link: &'a str,
}

/// Check the fields every lead needs
fn required_fields(record: &AdRecord) -> Result<Required<'_>, ValidationError> {
    let advertiser = non_blank(record.advertiser.as_deref()).ok_or(ValidationError::MissingAdvertiser)?;
    let library_id = non_blank(record.library_id.as_deref()).ok_or(ValidationError::MissingLibraryId)?;

    let facebook_link = non_blank(record.advertiser_facebook_link.as_deref()).unwrap_or_default();
    let Some((_, path)) = facebook_link.split_once("facebook.com/") else {
        return Err(ValidationError::InvalidFacebookLink(facebook_link.to_string()));
    };

    let page_name = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if !page_name.is_empty() && page_name.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NumericPageName(page_name.to_string()));
    }

    Ok(Required {
        advertiser,
        library_id,
        facebook_link,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Scores records and drafts outreach for them
pub struct Enricher<P: WebsiteProbe> {
    probe: P,
    config: ScoringConfig,
}

impl<P: WebsiteProbe> Enricher<P> {
    /// Create an enricher
    pub fn new(probe: P, config: ScoringConfig) -> Result<Self, ScorerError> {
        config.validate().map_err(ScorerError::Config)?;
        Ok(Self { probe, config })
    }

    /// Scoring configuration in use
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Enrich one record
    ///
    /// Probes the website at most once, and only for services that concern
    /// the website. A failed probe is reported in `issues`, never raised.
    pub async fn enrich(
        &self,
        record: &AdRecord,
        context: &EnrichContext,
    ) -> Result<Lead, ValidationError> {
        let required = required_fields(record)?;
        let analysis = context.analysis.clone().unwrap_or_default();
        let website = normalize_website(record.advertiser_website_link.as_deref());

        let service = resolve_service(
            analysis.service.as_deref(),
            required.advertiser,
            &self.config.default_service,
        );

        let site = if !needs_website_probe(&service) {
            SiteIssues::NotProbed
        } else if let Some(url) = website.as_deref() {
            match self.probe.probe(url).await {
                Ok(report) => SiteIssues::Checked(report),
                Err(e) => {
                    debug!(url, error = %e, "Website probe failed");
                    SiteIssues::Unreachable(probe_failure_reason(e))
                }
            }
        } else {
            SiteIssues::FacebookOnly
        };

        let contact = non_blank(record.contact.as_deref()).map(str::to_string);
        let text = [
            record.content_preview.as_deref().unwrap_or_default(),
            required.advertiser,
        ]
        .join(" ");
        let inputs = MetricInputs {
            text: &text,
            repeat_ads: context.repeat_ads.max(1),
            followers: context.followers,
            has_contact: contact.is_some(),
            has_website: website.is_some(),
        };

        let mut lead = Lead::new(required.advertiser, required.library_id, service);
        lead.facebook_link = Some(required.facebook_link.to_string());
        lead.website_link = website;
        lead.contact = contact;
        lead.start_date = record.start_date.clone();
        lead.active_time = record.active_time.clone();
        lead.content_preview = record.content_preview.clone();
        lead.delivery_cost_inside = record.delivery_cost_inside.clone();
        lead.delivery_cost_outside = record.delivery_cost_outside.clone();
        lead.probability = Lead::clamp_probability(analysis.probability.into());
        lead.reasoning = analysis.reasoning;
        lead.metrics = estimate_metrics(&inputs, site.report(), &self.config);
        lead.issues = site.summary(&self.config.probe);
        lead.tags.insert(SOURCE_TAG.to_string());

        let (pitch, link) = pitch_and_link(&lead);
        lead.pitch = pitch;
        lead.outreach_link = link;

        Ok(lead)
    }

    /// Enrich a batch, collecting rejections instead of stopping
    ///
    /// Repeats of the same (Facebook link, library id) pair are skipped.
    /// The number of ads per Facebook link is the repeat-ad signal.
    /// `analyses` maps library ids to page analyses run beforehand.
    pub async fn enrich_batch(
        &self,
        records: &[AdRecord],
        analyses: &HashMap<String, PageAnalysis>,
    ) -> EnrichmentReport {
        let mut ads_per_page: HashMap<&str, usize> = HashMap::new();
        for record in records {
            if let Some(link) = non_blank(record.advertiser_facebook_link.as_deref()) {
                *ads_per_page.entry(link).or_default() += 1;
            }
        }

        let mut report = EnrichmentReport::default();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for record in records {
            let link = non_blank(record.advertiser_facebook_link.as_deref());
            let library_id = non_blank(record.library_id.as_deref());
            if let (Some(link), Some(library_id)) = (link, library_id) {
                if !seen.insert((link, library_id)) {
                    debug!(library_id, "Skipping repeated ad");
                    report.duplicates += 1;
                    continue;
                }
            }

            let context = EnrichContext {
                repeat_ads: link.and_then(|l| ads_per_page.get(l).copied()).unwrap_or(1),
                followers: None,
                analysis: library_id.and_then(|id| analyses.get(id).cloned()),
            };

            match self.enrich(record, &context).await {
                Ok(lead) => {
                    debug!(
                        library_id = %lead.library_id,
                        probability = lead.probability,
                        service = %lead.service,
                        "Enriched lead"
                    );
                    report.leads.push(lead);
                }
                Err(reason) => {
                    warn!(
                        library_id = library_id.unwrap_or("-"),
                        reason = %reason,
                        "Rejected record"
                    );
                    report.rejected.push(Rejection {
                        library_id: record.library_id.clone(),
                        advertiser: record.advertiser.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            leads = report.leads.len(),
            rejected = report.rejected.len(),
            duplicates = report.duplicates,
            "Enrichment complete"
        );
        report
    }
}

fn probe_failure_reason(error: ScorerError) -> String {
    match error {
        ScorerError::Probe(reason) => reason,
        other => other.to_string(),
    }
}
