//! Derived lead metrics
//!
//! Deterministic keyword and threshold scoring. Cut-offs come from
//! [`ScoringConfig`]; labels are fixed.

use crate::config::ScoringConfig;
use crate::probe::SiteReport;
use adscout_domain::{DerivedMetrics, Level};
use regex::Regex;
use std::sync::LazyLock;

static ORDER_SIGNALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\border\b|\bঅর্ডার\b|\bকিনুন\b|\bকিনে\b").expect("valid order pattern"));

static DELIVERY_SIGNALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bডেলিভারি\b|\bক্যাশ অন ডেলিভারি\b").expect("valid delivery pattern"));

static URGENCY_SIGNALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bলিমিটেড\b|\bশেষ\b|\bতাড়াতাড়ি\b|\bআজই\b").expect("valid urgency pattern"));

/// Words inviting a message or a call
const INBOX_KEYWORDS: &[&str] = &["ইনবক্স", "মেসেজ", "কল"];

/// Signals a lead is scored from
#[derive(Debug, Clone, Default)]
pub struct MetricInputs<'a> {
    /// Ad copy, advertiser name and any scraped page text
    pub text: &'a str,

    /// Ads by the same page in this batch
    pub repeat_ads: usize,

    /// Page follower count, when known
    pub followers: Option<u64>,

    /// Whether the ad carries a contact
    pub has_contact: bool,

    /// Whether the advertiser has a website
    pub has_website: bool,
}

/// Compute the derived metrics for one lead
///
/// `site` is the probe report; without one the cart-abandon risk is Low.
pub fn estimate_metrics(
    inputs: &MetricInputs<'_>,
    site: Option<&SiteReport>,
    config: &ScoringConfig,
) -> DerivedMetrics {
    let text = inputs.text.to_lowercase();
    let signals = ORDER_SIGNALS.find_iter(&text).count() + DELIVERY_SIGNALS.find_iter(&text).count();

    let (estimated_daily_orders, estimated_monthly_revenue) = config
        .orders
        .tiers
        .iter()
        .find(|tier| signals >= tier.min_signals)
        .map(|tier| (tier.daily_orders.clone(), tier.monthly_revenue.clone()))
        .unwrap_or_else(|| {
            (
                config.orders.unknown_orders.clone(),
                config.orders.baseline_revenue.clone(),
            )
        });

    DerivedMetrics {
        estimated_daily_orders,
        ad_spend_intensity: ad_spend_intensity(&text, inputs.repeat_ads, config),
        cart_abandon_risk: site.map_or(Level::Low, |report| cart_abandon_risk(report, config)),
        estimated_monthly_revenue,
        dm_open_rate_prediction: dm_open_rate(&text, inputs, config).to_string(),
    }
}

fn ad_spend_intensity(text: &str, repeat_ads: usize, config: &ScoringConfig) -> Level {
    let thresholds = &config.intensity;
    let urgency = URGENCY_SIGNALS.find_iter(text).count();

    if repeat_ads >= thresholds.high_repeat_ads || urgency >= thresholds.high_urgency_signals {
        Level::High
    } else if repeat_ads >= thresholds.medium_repeat_ads {
        Level::Medium
    } else {
        Level::Low
    }
}

fn cart_abandon_risk(site: &SiteReport, config: &ScoringConfig) -> Level {
    let weights = &config.risk;
    let mut score = 0;
    if !site.https {
        score += weights.no_https;
    }
    if site.load_secs > weights.slow_load_secs {
        score += weights.slow_load;
    }
    if !site.has_viewport {
        score += weights.no_viewport;
    }

    if score >= weights.high {
        Level::High
    } else if score >= weights.medium {
        Level::Medium
    } else {
        Level::Low
    }
}

fn dm_open_rate(text: &str, inputs: &MetricInputs<'_>, config: &ScoringConfig) -> &'static str {
    let weights = &config.dm;
    let mut score = 0;
    if inputs.followers.unwrap_or(0) < weights.small_page_followers {
        score += weights.small_page;
    }
    if inputs.has_contact {
        score += weights.contact;
    }
    if inputs.has_website {
        score += weights.website;
    }
    if INBOX_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        score += weights.inbox_keywords;
    }

    if score >= weights.high {
        "High (70%+)"
    } else if score >= weights.medium {
        "Medium (50%)"
    } else {
        "Low (<30%)"
    }
}
