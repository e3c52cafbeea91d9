//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use adscout_domain::traits::{BulkUpsertSummary, LeadStats};
use adscout_domain::{Lead, LeadStatus, RecordSet};
use adscout_extractor::ExtractionReport;
use adscout_scorer::EnrichmentReport;
use colored::{Color, Colorize};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Probability at which a lead is shown as hot
const HOT_PROBABILITY: u8 = 80;

/// Probability at which a lead is shown as warm
const WARM_PROBABILITY: u8 = 65;

/// Longest advertiser name shown in tables
const NAME_WIDTH: usize = 28;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of leads.
    pub fn format_leads(&self, leads: &[Lead]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(leads)?),
            OutputFormat::Table => Ok(self.format_leads_table(leads)),
            OutputFormat::Quiet => Ok(leads
                .iter()
                .map(|l| l.library_id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_leads_table(&self, leads: &[Lead]) -> String {
        if leads.is_empty() {
            return self.colorize("No leads found.", Color::Yellow);
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Library ID", "Advertiser", "Prob", "Service", "Status", "Contact", "Cart Risk",
        ]);

        for lead in leads {
            builder.push_record([
                lead.library_id.clone(),
                truncate(&lead.advertiser, NAME_WIDTH),
                self.probability(lead.probability),
                lead.service.clone(),
                self.status(lead.status),
                lead.contact.clone().unwrap_or_else(|| "-".to_string()),
                lead.metrics.cart_abandon_risk.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format per-status lead counts.
    pub fn format_stats(&self, stats: &LeadStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let by_status: serde_json::Map<String, serde_json::Value> = stats
                    .by_status
                    .iter()
                    .map(|(status, count)| (status.to_string(), (*count).into()))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "total": stats.total,
                    "by_status": by_status,
                }))?)
            }
            OutputFormat::Quiet => Ok(stats.total.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Status", "Leads"]);
                for status in LeadStatus::ALL {
                    let count = stats.by_status.get(&status).copied().unwrap_or(0);
                    builder.push_record([self.status(status), count.to_string()]);
                }
                builder.push_record(["total".to_string(), stats.total.to_string()]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a summary of the record file.
    pub fn format_summary(&self, records: &RecordSet, top: usize) -> Result<String> {
        let counts = records.advertiser_counts();
        let missing_ids = records.ads.iter().filter(|ad| ad.library_id().is_none()).count();

        match self.format {
            OutputFormat::Json => {
                let advertisers: Vec<_> = counts
                    .iter()
                    .take(top)
                    .map(|(name, ads)| serde_json::json!({ "advertiser": name, "ads": ads }))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "total_ads": records.total_ads,
                    "advertisers": counts.len(),
                    "without_library_id": missing_ids,
                    "top_advertisers": advertisers,
                }))?)
            }
            OutputFormat::Quiet => Ok(records.total_ads.to_string()),
            OutputFormat::Table => {
                let mut out = format!(
                    "{} ads from {} advertisers ({} without library id)\n",
                    records.total_ads,
                    counts.len(),
                    missing_ids
                );
                if counts.is_empty() {
                    return Ok(out);
                }

                let mut builder = Builder::default();
                builder.push_record(["Advertiser", "Ads"]);
                for (name, ads) in counts.iter().take(top) {
                    builder.push_record([truncate(name, NAME_WIDTH), ads.to_string()]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                out.push_str(&table.to_string());
                Ok(out)
            }
        }
    }

    /// Format the result of an extraction run.
    pub fn format_extraction(&self, report: &ExtractionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report.ads_added().to_string()),
            OutputFormat::Table => {
                let meta = &report.metadata;
                let mut lines = vec![self.success(&format!(
                    "Added {} new ad(s) to {} ({} found in {} chunk(s), {:.1}s)",
                    report.ads_added(),
                    meta.output_file.display(),
                    report.ads_found(),
                    report.chunks_total(),
                    meta.processing_time_ms as f64 / 1000.0
                ))];
                for failure in &report.failures {
                    lines.push(self.warning(&format!(
                        "Chunk {} failed: {}",
                        failure.chunk, failure.reason
                    )));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the result of an enrichment run.
    pub fn format_enrichment(
        &self,
        report: &EnrichmentReport,
        stored: Option<&BulkUpsertSummary>,
    ) -> Result<String> {
        if self.format != OutputFormat::Table {
            return self.format_leads(&report.leads);
        }

        let mut lines = vec![self.format_leads_table(&report.leads)];
        for rejection in &report.rejected {
            lines.push(self.warning(&format!(
                "Rejected {} ({}): {}",
                rejection.library_id.as_deref().unwrap_or("-"),
                rejection.advertiser.as_deref().unwrap_or("unknown advertiser"),
                rejection.reason
            )));
        }
        if report.duplicates > 0 {
            lines.push(self.info(&format!("Skipped {} repeated ad(s)", report.duplicates)));
        }
        match stored {
            Some(summary) => {
                lines.push(self.success(&format!(
                    "Saved {} new, updated {} lead(s)",
                    summary.saved, summary.updated
                )));
                for error in &summary.errors {
                    lines.push(self.error(&format!("Not saved: {}", error)));
                }
            }
            None => lines.push(self.info("Dry run: nothing was saved")),
        }
        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    fn probability(&self, probability: u8) -> String {
        let text = format!("{}%", probability);
        if probability >= HOT_PROBABILITY {
            self.colorize(&text, Color::Green)
        } else if probability >= WARM_PROBABILITY {
            self.colorize(&text, Color::Yellow)
        } else {
            text
        }
    }

    fn status(&self, status: LeadStatus) -> String {
        let color = match status {
            LeadStatus::New => Color::Cyan,
            LeadStatus::Messaged | LeadStatus::InTalk => Color::Blue,
            LeadStatus::Client => Color::Green,
            LeadStatus::Rejected => Color::Red,
            LeadStatus::Archived => Color::BrightBlack,
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        text.color(color).to_string()
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
