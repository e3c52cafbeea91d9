//! Extract command implementation.

use crate::cli::{ExtractArgs, ExtractPreset};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use adscout_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
use adscout_llm::OllamaProvider;
use std::fs;

/// Build the extractor configuration for this run.
fn run_config(args: &ExtractArgs, config: &Config) -> Result<ExtractorConfig> {
    let mut extractor = match args.preset {
        None => config.extractor.clone(),
        Some(preset) => ExtractorConfig {
            output_file: config.extractor.output_file.clone(),
            chunk_strategy: config.extractor.chunk_strategy,
            ..preset_config(preset)
        },
    };
    if let Some(output) = &args.output {
        extractor.output_file = output.clone();
    }
    if let Some(size) = args.chunk_size {
        extractor.max_chunk_size = size;
    }
    if let Some(overlap) = args.overlap {
        extractor.chunk_overlap = overlap;
    }
    extractor.validate().map_err(CliError::InvalidInput)?;
    Ok(extractor)
}

fn preset_config(preset: ExtractPreset) -> ExtractorConfig {
    match preset {
        ExtractPreset::Balanced => ExtractorConfig::default(),
        ExtractPreset::Aggressive => ExtractorConfig::aggressive(),
        ExtractPreset::Lenient => ExtractorConfig::lenient(),
    }
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    if args.query.trim().is_empty() {
        return Err(CliError::InvalidInput("Query must not be empty".to_string()));
    }
    let extractor_config = run_config(&args, config)?;
    let text = fs::read_to_string(&args.input)?;

    let llm = OllamaProvider::with_timeout(
        &config.llm.endpoint,
        &config.llm.model,
        extractor_config.extraction_timeout(),
    )?;
    let extractor = Extractor::new(llm, extractor_config)?;
    let report = extractor
        .extract(ExtractionRequest::new(text, args.query))
        .await?;

    println!("{}", formatter.format_extraction(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> ExtractArgs {
        ExtractArgs {
            input: PathBuf::from("page.txt"),
            query: "minifan".to_string(),
            output: None,
            chunk_size: None,
            overlap: None,
            preset: None,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut args = args();
        args.output = Some(PathBuf::from("minifan.json"));
        args.chunk_size = Some(5000);

        let config = run_config(&args, &Config::default()).unwrap();
        assert_eq!(config.output_file, PathBuf::from("minifan.json"));
        assert_eq!(config.max_chunk_size, 5000);
        assert_eq!(config.chunk_overlap, 500);
    }

    #[test]
    fn test_preset_keeps_output_and_takes_overrides() {
        let mut config = Config::default();
        config.extractor.output_file = PathBuf::from("shops.json");
        config.extractor.max_chunk_size = 9000;

        let mut args = args();
        args.preset = Some(ExtractPreset::Aggressive);
        let aggressive = run_config(&args, &config).unwrap();
        assert_eq!(aggressive.max_chunk_size, ExtractorConfig::aggressive().max_chunk_size);
        assert_eq!(aggressive.cooldown_ms, ExtractorConfig::aggressive().cooldown_ms);
        assert_eq!(aggressive.output_file, PathBuf::from("shops.json"));

        args.preset = Some(ExtractPreset::Lenient);
        args.overlap = Some(100);
        let lenient = run_config(&args, &config).unwrap();
        assert_eq!(lenient.extraction_timeout_secs, 300);
        assert_eq!(lenient.chunk_overlap, 100);
    }

    #[test]
    fn test_bad_overlap_rejected() {
        let mut args = args();
        args.overlap = Some(2000);
        assert!(matches!(
            run_config(&args, &Config::default()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
