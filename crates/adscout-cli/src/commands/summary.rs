//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use adscout_extractor::RecordStore;

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let path = args.file.unwrap_or_else(|| config.extractor.output_file.clone());
    let records = RecordStore::new(path).load();
    println!("{}", formatter.format_summary(&records, args.top)?);
    Ok(())
}
