//! Enrich command implementation.

use crate::cli::EnrichArgs;
use crate::config::Config;
use crate::error::Result;
use crate::export::write_csv;
use crate::output::Formatter;
use adscout_domain::traits::{LeadStore, LlmProvider};
use adscout_domain::AdRecord;
use adscout_extractor::RecordStore;
use adscout_llm::OllamaProvider;
use adscout_scorer::{
    Enricher, HttpProbe, PageAnalysis, PageAnalyzer, ScoringConfig, WebsiteProbe,
};
use adscout_store::SqliteLeadStore;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Analysis calls get the same budget as an extraction call
fn analysis_timeout(config: &Config) -> Duration {
    config.extractor.extraction_timeout()
}

/// Scoring settings for this run
///
/// The conservative preset replaces the thresholds only; the configured
/// default service and website probe settings still apply.
fn scoring_config(args: &EnrichArgs, config: &Config) -> ScoringConfig {
    if !args.conservative {
        return config.scoring.clone();
    }
    ScoringConfig {
        default_service: config.scoring.default_service.clone(),
        probe: config.scoring.probe.clone(),
        ..ScoringConfig::conservative()
    }
}

/// Text the analyzer judges for a record: the ad copy and who placed it.
fn analysis_text(record: &AdRecord) -> String {
    [
        record.advertiser.as_deref().unwrap_or_default(),
        record.content_preview.as_deref().unwrap_or_default(),
    ]
    .join("\n")
}

/// Run page analysis for every record with a library id.
pub async fn analyze_records<L: LlmProvider>(
    analyzer: &PageAnalyzer<L>,
    records: &[AdRecord],
) -> HashMap<String, PageAnalysis> {
    let mut analyses = HashMap::new();
    for record in records {
        if let Some(id) = record.library_id() {
            if analyses.contains_key(id) {
                continue;
            }
            let analysis = analyzer.analyze(&analysis_text(record)).await;
            analyses.insert(id.to_string(), analysis);
        }
    }
    analyses
}

/// Score, store and export a batch of records.
pub async fn enrich_records<P: WebsiteProbe>(
    records: &[AdRecord],
    enricher: &Enricher<P>,
    analyses: &HashMap<String, PageAnalysis>,
    store: Option<(&mut SqliteLeadStore, &std::path::Path)>,
    formatter: &Formatter,
) -> Result<String> {
    let report = enricher.enrich_batch(records, analyses).await;

    let Some((store, csv_path)) = store else {
        return formatter.format_enrichment(&report, None);
    };

    let summary = store.bulk_upsert(&report.leads);
    let exported = write_csv(csv_path, &store.all_leads()?)?;
    info!(
        saved = summary.saved,
        updated = summary.updated,
        exported,
        "Stored enriched leads"
    );
    formatter.format_enrichment(&report, Some(&summary))
}

/// Execute the enrich command.
pub async fn execute_enrich(
    args: EnrichArgs,
    config: &Config,
    store: &mut SqliteLeadStore,
    formatter: &Formatter,
) -> Result<()> {
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| config.extractor.output_file.clone());
    let records = RecordStore::new(path).load().ads;

    let scoring = scoring_config(&args, config);
    let analyses = if args.analyze {
        let llm = OllamaProvider::with_timeout(
            &config.llm.endpoint,
            &config.llm.model,
            analysis_timeout(config),
        )?;
        analyze_records(&PageAnalyzer::new(llm, &scoring), &records).await
    } else {
        HashMap::new()
    };

    let probe = HttpProbe::new(&scoring.probe)?;
    let enricher = Enricher::new(probe, scoring)?;

    let csv_path = args.csv.unwrap_or_else(|| config.storage.csv_file.clone());
    let target = (!args.dry_run).then_some((store, csv_path.as_path()));

    let output = enrich_records(&records, &enricher, &analyses, target, formatter).await?;
    println!("{}", output);
    Ok(())
}
