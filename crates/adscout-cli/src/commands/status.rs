//! Status command implementation.

use crate::cli::StatusArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use adscout_domain::traits::LeadStore;
use adscout_domain::LeadStatus;
use adscout_store::SqliteLeadStore;

/// Parse a status name, listing the valid names on failure.
pub fn parse_status(name: &str) -> Result<LeadStatus> {
    LeadStatus::parse(name).ok_or_else(|| {
        let valid: Vec<_> = LeadStatus::ALL.iter().map(|s| s.as_str()).collect();
        CliError::InvalidInput(format!(
            "Unknown status '{}' (expected one of: {})",
            name,
            valid.join(", ")
        ))
    })
}

/// Execute the status command.
pub fn execute_status(
    args: StatusArgs,
    store: &mut SqliteLeadStore,
    formatter: &Formatter,
) -> Result<()> {
    let status = parse_status(&args.status)?;
    if !store.update_status(&args.library_id, status, args.note.as_deref())? {
        return Err(CliError::NotFound(args.library_id));
    }

    println!(
        "{}",
        formatter.success(&format!("Lead {} is now {}", args.library_id.trim(), status))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use adscout_domain::Lead;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("In-Talk").unwrap(), LeadStatus::InTalk);
        let err = parse_status("won").unwrap_err();
        assert!(err.to_string().contains("in-talk"));
    }

    #[test]
    fn test_status_updates_lead() {
        let mut store = SqliteLeadStore::new(":memory:").unwrap();
        store.upsert(&Lead::new("Shop", "123", "E-commerce")).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = StatusArgs {
            library_id: "123".to_string(),
            status: "client".to_string(),
            note: Some("paid deposit".to_string()),
        };
        execute_status(args, &mut store, &formatter).unwrap();

        let lead = store.get_lead("123").unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::Client);
        assert_eq!(lead.notes[0].text, "paid deposit");
    }

    #[test]
    fn test_unknown_lead_is_not_found() {
        let mut store = SqliteLeadStore::new(":memory:").unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let args = StatusArgs {
            library_id: "404".to_string(),
            status: "messaged".to_string(),
            note: None,
        };
        assert!(matches!(
            execute_status(args, &mut store, &formatter),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_status_leaves_lead_alone() {
        let mut store = SqliteLeadStore::new(":memory:").unwrap();
        store.upsert(&Lead::new("Shop", "123", "E-commerce")).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let args = StatusArgs {
            library_id: "123".to_string(),
            status: "done".to_string(),
            note: None,
        };
        assert!(execute_status(args, &mut store, &formatter).is_err());
        assert_eq!(store.get_lead("123").unwrap().unwrap().version, 1);
    }
}
