//! Top command implementation.

use crate::cli::TopArgs;
use crate::error::Result;
use crate::output::Formatter;
use adscout_domain::traits::LeadStore;
use adscout_store::SqliteLeadStore;

/// Execute the top command.
pub fn execute_top(args: TopArgs, store: &SqliteLeadStore, formatter: &Formatter) -> Result<()> {
    let leads = store.get_high_priority(args.min, args.limit)?;
    println!("{}", formatter.format_leads(&leads)?);
    Ok(())
}
