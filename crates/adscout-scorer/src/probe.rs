//! Website reachability and hygiene probe
//!
//! One GET per site. The findings feed both the `issues` summary shown to
//! the reviewer and the cart-abandon risk score.

use crate::config::ProbeConfig;
use crate::error::ScorerError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Instant;
use tracing::debug;

/// Summary for advertisers that sell only through their Facebook page
pub const FB_ONLY_MESSAGE: &str = "FB-only store — perfect for AI Chatbot + Auto-Order System";

/// Summary when the recommended service does not involve the website
pub const NOT_PROBED_MESSAGE: &str = "Service-based — website optional";

/// Summary when a probed site shows no problems
pub const HEALTHY_MESSAGE: &str = "Site is fast, secure, mobile-ready.";

/// Security headers and what their absence means
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", "Missing CSP"),
    ("x-frame-options", "Clickjacking risk"),
    ("x-content-type-options", "MIME sniffing risk"),
    ("referrer-policy", "Leaking referrers"),
];

/// What one probe of a website found
#[derive(Debug, Clone, PartialEq)]
pub struct SiteReport {
    /// URL after redirects
    pub final_url: String,

    /// Time to fetch the page, in seconds
    pub load_secs: f64,

    /// Whether the final URL is served over HTTPS
    pub https: bool,

    /// Messages for missing security headers
    pub missing_headers: Vec<&'static str>,

    /// Whether the page declares a mobile viewport
    pub has_viewport: bool,

    /// Whether the page is a Shopify store
    pub shopify: bool,

    /// Whether the page has a cart but no checkout
    pub cart_without_checkout: bool,
}

impl SiteReport {
    /// Build a report from a fetched page
    pub fn from_page(final_url: &str, load_secs: f64, headers: &HeaderMap, body: &str) -> Self {
        let body = body.to_lowercase();
        Self {
            final_url: final_url.to_string(),
            load_secs,
            https: final_url.starts_with("https://"),
            missing_headers: SECURITY_HEADERS
                .iter()
                .filter(|(name, _)| !headers.contains_key(*name))
                .map(|(_, message)| *message)
                .collect(),
            has_viewport: body.contains("viewport"),
            shopify: body.contains("shopify"),
            cart_without_checkout: body.contains("add to cart") && !body.contains("checkout"),
        }
    }

    /// Findings worth mentioning, most important first
    pub fn issues(&self, config: &ProbeConfig) -> Vec<String> {
        let mut issues = Vec::new();

        if self.load_secs > config.slow_secs {
            issues.push(format!(
                "Load time: {:.1}s (slow — lose 40% mobile users)",
                self.load_secs
            ));
        } else if self.load_secs > config.fixable_secs {
            issues.push(format!("Load time: {:.1}s (fixable)", self.load_secs));
        }
        if !self.https {
            issues.push("No HTTPS — Google flags as 'Not Secure'".to_string());
        }
        if !self.missing_headers.is_empty() {
            let shown: Vec<_> = self.missing_headers.iter().take(2).copied().collect();
            issues.push(format!("Missing headers: {}", shown.join(", ")));
        }
        if !self.has_viewport {
            issues.push("No mobile viewport — broken on phones".to_string());
        }
        if self.shopify {
            issues.push("Shopify — can secure & optimize".to_string());
        }
        if self.cart_without_checkout {
            issues.push("Cart exists but no secure checkout".to_string());
        }

        issues.truncate(config.max_issues);
        issues
    }
}

/// Outcome of the website step of enrichment
#[derive(Debug, Clone, PartialEq)]
pub enum SiteIssues {
    /// The recommended service does not need the website
    NotProbed,

    /// The advertiser has no website
    FacebookOnly,

    /// The probe failed
    Unreachable(String),

    /// The probe succeeded
    Checked(SiteReport),
}

impl SiteIssues {
    /// Probe findings, when a probe succeeded
    pub fn report(&self) -> Option<&SiteReport> {
        match self {
            SiteIssues::Checked(report) => Some(report),
            _ => None,
        }
    }

    /// One-line summary stored on the lead
    pub fn summary(&self, config: &ProbeConfig) -> String {
        match self {
            SiteIssues::NotProbed => NOT_PROBED_MESSAGE.to_string(),
            SiteIssues::FacebookOnly => FB_ONLY_MESSAGE.to_string(),
            SiteIssues::Unreachable(reason) => {
                let reason: String = reason.chars().take(80).collect();
                format!("Site unreachable: {}", reason)
            }
            SiteIssues::Checked(report) => {
                let issues = report.issues(config);
                if issues.is_empty() {
                    HEALTHY_MESSAGE.to_string()
                } else {
                    issues.join(" | ")
                }
            }
        }
    }
}

/// Clean a scraped website field into a fetchable URL
///
/// Placeholders such as `None` or `FB Only` mean there is no website.
pub fn normalize_website(raw: Option<&str>) -> Option<String> {
    let website = raw?.trim();
    let placeholder = ["", "none", "null", "fb only"]
        .iter()
        .any(|p| website.eq_ignore_ascii_case(p));
    if placeholder {
        return None;
    }

    if website.starts_with("http://") || website.starts_with("https://") {
        Some(website.to_string())
    } else {
        Some(format!("https://{}", website))
    }
}

/// Fetches a website and reports what it finds
#[async_trait]
pub trait WebsiteProbe: Send + Sync {
    /// Probe one URL
    async fn probe(&self, url: &str) -> Result<SiteReport, ScorerError>;
}

/// Probe over plain HTTP(S) GET
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Create a probe with the configured timeout
    pub fn new(config: &ProbeConfig) -> Result<Self, ScorerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("adscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScorerError::Probe(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebsiteProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<SiteReport, ScorerError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScorerError::Probe(e.to_string()))?;

        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ScorerError::Probe(e.to_string()))?;
        let load_secs = started.elapsed().as_secs_f64();

        debug!(url, final_url = %final_url, load_secs, "Probed website");
        Ok(SiteReport::from_page(&final_url, load_secs, &headers, &body))
    }
}
