//! Stats command implementation.

use crate::error::Result;
use crate::output::Formatter;
use adscout_domain::traits::LeadStore;
use adscout_store::SqliteLeadStore;

/// Execute the stats command.
pub fn execute_stats(store: &SqliteLeadStore, formatter: &Formatter) -> Result<()> {
    let stats = store.get_stats()?;
    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}
