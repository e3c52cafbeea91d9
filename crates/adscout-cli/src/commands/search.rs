//! Search command implementation.

use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use adscout_domain::traits::LeadStore;
use adscout_store::SqliteLeadStore;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, store: &SqliteLeadStore, formatter: &Formatter) -> Result<()> {
    if args.query.trim().is_empty() {
        return Err(CliError::InvalidInput("Search query must not be empty".to_string()));
    }

    let leads = store.search(&args.query)?;
    println!("{}", formatter.format_leads(&leads)?);
    Ok(())
}
