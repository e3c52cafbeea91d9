//! Scoring thresholds
//!
//! Every cut-off used by the derived metrics and the website probe lives
//! here so it can be tuned from TOML without touching the scoring code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One step of the order-volume ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTier {
    /// Minimum order plus delivery signals for this tier
    pub min_signals: usize,

    /// Daily order label ("20–50/day")
    pub daily_orders: String,

    /// Monthly revenue band for this tier
    pub monthly_revenue: String,
}

impl OrderTier {
    fn new(min_signals: usize, daily_orders: &str, monthly_revenue: &str) -> Self {
        Self {
            min_signals,
            daily_orders: daily_orders.to_string(),
            monthly_revenue: monthly_revenue.to_string(),
        }
    }
}

/// Order-volume ladder and the fallback labels below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderThresholds {
    /// Label when no tier matches
    pub unknown_orders: String,

    /// Revenue band when no tier matches
    pub baseline_revenue: String,

    /// Tiers, highest `min_signals` first
    pub tiers: Vec<OrderTier>,
}

impl Default for OrderThresholds {
    fn default() -> Self {
        Self {
            unknown_orders: "Unknown".to_string(),
            baseline_revenue: "< ৳150K".to_string(),
            tiers: vec![
                OrderTier::new(5, "20–50/day", "৳600K – ৳1.5M"),
                OrderTier::new(3, "10–20/day", "৳300K – ৳600K"),
                OrderTier::new(1, "5–10/day", "৳150K – ৳300K"),
            ],
        }
    }
}

/// Ad-spend intensity cut-offs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityThresholds {
    /// Ads per page in the batch for High
    pub high_repeat_ads: usize,

    /// Urgency words for High
    pub high_urgency_signals: usize,

    /// Ads per page in the batch for Medium
    pub medium_repeat_ads: usize,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self {
            high_repeat_ads: 3,
            high_urgency_signals: 2,
            medium_repeat_ads: 2,
        }
    }
}

/// Cart-abandon risk weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// Added when the site is served without HTTPS
    pub no_https: u32,

    /// Added when the page loads slower than `slow_load_secs`
    pub slow_load: u32,

    /// Load time above which `slow_load` applies
    pub slow_load_secs: f64,

    /// Added when the page has no mobile viewport
    pub no_viewport: u32,

    /// Score for High
    pub high: u32,

    /// Score for Medium
    pub medium: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            no_https: 40,
            slow_load: 30,
            slow_load_secs: 4.0,
            no_viewport: 20,
            high: 60,
            medium: 30,
        }
    }
}

/// DM open-rate weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmWeights {
    /// Pages below this follower count read their inbox
    pub small_page_followers: u64,

    /// Added for small pages
    pub small_page: u32,

    /// Added when the ad carries a contact
    pub contact: u32,

    /// Added when the advertiser has a website
    pub website: u32,

    /// Added when the ad invites messages or calls
    pub inbox_keywords: u32,

    /// Score for "High (70%+)"
    pub high: u32,

    /// Score for "Medium (50%)"
    pub medium: u32,
}

impl Default for DmWeights {
    fn default() -> Self {
        Self {
            small_page_followers: 20_000,
            small_page: 30,
            contact: 25,
            website: 15,
            inbox_keywords: 20,
            high: 70,
            medium: 50,
        }
    }
}

/// Website probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Load time reported as slow
    pub slow_secs: f64,

    /// Load time reported as fixable
    pub fixable_secs: f64,

    /// Issues kept in the summary
    pub max_issues: usize,
}

impl ProbeConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 12,
            slow_secs: 5.0,
            fixable_secs: 3.0,
            max_issues: 4,
        }
    }
}

/// Configuration for lead scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Service used when neither analysis nor keywords give one
    pub default_service: String,

    /// Page text sent to the analyzer (characters)
    pub page_text_max_chars: usize,

    /// Shorter page text is not worth analyzing (characters)
    pub page_text_min_chars: usize,

    /// Order-volume ladder
    pub orders: OrderThresholds,

    /// Ad-spend intensity cut-offs
    pub intensity: IntensityThresholds,

    /// Cart-abandon risk weights
    pub risk: RiskWeights,

    /// DM open-rate weights
    pub dm: DmWeights,

    /// Website probe settings
    pub probe: ProbeConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_service: "E-commerce".to_string(),
            page_text_max_chars: 2_000,
            page_text_min_chars: 50,
            orders: OrderThresholds::default(),
            intensity: IntensityThresholds::default(),
            risk: RiskWeights::default(),
            dm: DmWeights::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Conservative preset: more evidence needed before a lead looks busy
    pub fn conservative() -> Self {
        Self {
            orders: OrderThresholds {
                tiers: vec![
                    OrderTier::new(8, "20–50/day", "৳600K – ৳1.5M"),
                    OrderTier::new(5, "10–20/day", "৳300K – ৳600K"),
                    OrderTier::new(2, "5–10/day", "৳150K – ৳300K"),
                ],
                ..OrderThresholds::default()
            },
            intensity: IntensityThresholds {
                high_repeat_ads: 5,
                high_urgency_signals: 3,
                medium_repeat_ads: 3,
            },
            dm: DmWeights {
                high: 80,
                medium: 60,
                ..DmWeights::default()
            },
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_service.trim().is_empty() {
            return Err("default_service must not be empty".to_string());
        }
        if self.page_text_max_chars == 0 {
            return Err("page_text_max_chars must be greater than 0".to_string());
        }
        if self
            .orders
            .tiers
            .windows(2)
            .any(|pair| pair[0].min_signals <= pair[1].min_signals)
        {
            return Err("orders.tiers must be sorted by min_signals, highest first".to_string());
        }
        if self.orders.tiers.iter().any(|tier| tier.min_signals == 0) {
            return Err("orders.tiers min_signals must be greater than 0".to_string());
        }
        if self.intensity.medium_repeat_ads > self.intensity.high_repeat_ads {
            return Err("intensity.medium_repeat_ads cannot exceed high_repeat_ads".to_string());
        }
        if self.risk.medium > self.risk.high {
            return Err("risk.medium cannot exceed risk.high".to_string());
        }
        if self.dm.medium > self.dm.high {
            return Err("dm.medium cannot exceed dm.high".to_string());
        }
        if self.probe.timeout_secs == 0 {
            return Err("probe.timeout_secs must be greater than 0".to_string());
        }
        if self.probe.fixable_secs > self.probe.slow_secs {
            return Err("probe.fixable_secs cannot exceed probe.slow_secs".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
