//! Lead status - review stages for leads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a lead in the outreach workflow
///
/// Leads start as `New` and are moved along by human review:
/// - Messaged: Outreach sent
/// - InTalk: Conversation ongoing
/// - Rejected: Not interested
/// - Client: Converted
/// - Archived: Out of the working set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    /// Not yet contacted
    #[default]
    New,

    /// Outreach message sent
    Messaged,

    /// Conversation in progress
    InTalk,

    /// Declined
    Rejected,

    /// Converted to a paying client
    Client,

    /// Removed from the working set
    Archived,
}

impl LeadStatus {
    /// Every status, in workflow order
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Messaged,
        LeadStatus::InTalk,
        LeadStatus::Rejected,
        LeadStatus::Client,
        LeadStatus::Archived,
    ];

    /// Get the status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Messaged => "messaged",
            LeadStatus::InTalk => "in-talk",
            LeadStatus::Rejected => "rejected",
            LeadStatus::Client => "client",
            LeadStatus::Archived => "archived",
        }
    }

    /// Parse a status from its stored name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "messaged" => Some(LeadStatus::Messaged),
            "in-talk" => Some(LeadStatus::InTalk),
            "rejected" => Some(LeadStatus::Rejected),
            "client" => Some(LeadStatus::Client),
            "archived" => Some(LeadStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}
