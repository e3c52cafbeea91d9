//! Lead module - enriched ad records

use crate::status::LeadStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Three-step categorical level used by derived metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Low
    #[default]
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

impl Level {
    /// Get the level name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }

    /// Parse a stored level name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucketed estimates derived from keyword signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Order volume tier ("10–20/day", "Unknown")
    pub estimated_daily_orders: String,

    /// How hard the advertiser is pushing ads
    pub ad_spend_intensity: Level,

    /// Risk of losing buyers at checkout
    pub cart_abandon_risk: Level,

    /// Revenue band looked up from the order tier
    pub estimated_monthly_revenue: String,

    /// Likelihood the advertiser reads a direct message
    pub dm_open_rate_prediction: String,
}

impl Default for DerivedMetrics {
    fn default() -> Self {
        Self {
            estimated_daily_orders: "Unknown".to_string(),
            ad_spend_intensity: Level::Low,
            cart_abandon_risk: Level::Low,
            estimated_monthly_revenue: "< ৳150K".to_string(),
            dm_open_rate_prediction: "Low (<30%)".to_string(),
        }
    }
}

/// Timestamped free-form review note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note text
    pub text: String,

    /// When the note was written
    pub at: DateTime<Utc>,
}

impl Note {
    /// Create a note stamped with the current time
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// An ad record enriched with scoring, pitch and review state
///
/// One lead exists per library identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Advertiser (page) name, never empty
    pub advertiser: String,

    /// Facebook page link
    pub facebook_link: Option<String>,

    /// Website link, `None` for Facebook-only stores
    pub website_link: Option<String>,

    /// Phone number or other contact handle
    pub contact: Option<String>,

    /// Ad Library identifier, never empty
    pub library_id: String,

    /// Date the ad started running
    pub start_date: Option<String>,

    /// Active time description
    pub active_time: Option<String>,

    /// First part of the ad copy
    pub content_preview: Option<String>,

    /// Delivery charge inside the city
    pub delivery_cost_inside: Option<String>,

    /// Delivery charge outside the city
    pub delivery_cost_outside: Option<String>,

    /// Purchase probability, 0-100
    pub probability: u8,

    /// Recommended service, never empty
    pub service: String,

    /// Why the probability and service were chosen
    pub reasoning: String,

    /// Website findings summary
    pub issues: String,

    /// Derived estimates
    #[serde(flatten)]
    pub metrics: DerivedMetrics,

    /// Review status
    #[serde(default)]
    pub status: LeadStatus,

    /// Free-form labels
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Review notes, oldest first
    #[serde(default)]
    pub notes: Vec<Note>,

    /// Outreach message draft
    pub pitch: String,

    /// WhatsApp deep link carrying the pitch
    pub outreach_link: Option<String>,

    /// First persisted
    pub created_at: DateTime<Utc>,

    /// Last modified
    pub updated_at: DateTime<Utc>,

    /// Incremented on every write
    #[serde(default)]
    pub version: i64,
}

impl Lead {
    /// Create a lead with default scoring fields and current timestamps
    pub fn new(
        advertiser: impl Into<String>,
        library_id: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            advertiser: advertiser.into(),
            facebook_link: None,
            website_link: None,
            contact: None,
            library_id: library_id.into(),
            start_date: None,
            active_time: None,
            content_preview: None,
            delivery_cost_inside: None,
            delivery_cost_outside: None,
            probability: 0,
            service: service.into(),
            reasoning: String::new(),
            issues: String::new(),
            metrics: DerivedMetrics::default(),
            status: LeadStatus::New,
            tags: BTreeSet::new(),
            notes: Vec::new(),
            pitch: String::new(),
            outreach_link: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Clamp an arbitrary score into the 0-100 probability range
    pub fn clamp_probability(score: i64) -> u8 {
        score.clamp(0, 100) as u8
    }

    /// Whether the lead has a non-blank contact
    pub fn has_contact(&self) -> bool {
        self.contact
            .as_deref()
            .map_or(false, |c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_probability() {
        assert_eq!(Lead::clamp_probability(-5), 0);
        assert_eq!(Lead::clamp_probability(42), 42);
        assert_eq!(Lead::clamp_probability(250), 100);
    }

    #[test]
    fn test_new_lead_defaults() {
        let lead = Lead::new("Foo", "123", "E-commerce");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.metrics.cart_abandon_risk, Level::Low);
        assert_eq!(lead.metrics.estimated_daily_orders, "Unknown");
        assert!(!lead.has_contact());
    }

    #[test]
    fn test_has_contact_ignores_blank() {
        let mut lead = Lead::new("Foo", "123", "E-commerce");
        lead.contact = Some("   ".to_string());
        assert!(!lead.has_contact());
        lead.contact = Some("01712345678".to_string());
        assert!(lead.has_contact());
    }

    #[test]
    fn test_metrics_flatten_in_json() {
        let lead = Lead::new("Foo", "123", "E-commerce");
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["cart_abandon_risk"], "Low");
        assert_eq!(value["status"], "new");
    }
}
