//! Recover ad records from free-form generative output
//!
//! The service is asked for a bare `{"ads": [...]}` object but often wraps
//! it in a fenced block or surrounds it with prose. Each [`ParseStrategy`]
//! proposes one candidate slice of the response; the first candidate that
//! deserializes as an envelope wins.

use adscout_domain::AdRecord;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("valid fenced block pattern")
});

static ADS_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{\s*"ads"\s*:\s*\[.*?\]\s*\}"#).expect("valid ads object pattern")
});

/// Expected top-level shape of a response
#[derive(Deserialize)]
struct AdEnvelope {
    ads: Vec<AdRecord>,
}

/// One way of locating the structured payload inside a response
pub trait ParseStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Slice of `response` that may hold the payload
    fn candidate<'a>(&self, response: &'a str) -> Option<&'a str>;
}

/// Object inside a ```` ```json ```` or bare ```` ``` ```` fence
pub struct FencedBlock;

impl ParseStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced-block"
    }

    fn candidate<'a>(&self, response: &'a str) -> Option<&'a str> {
        FENCED_BLOCK
            .captures(response)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Everything from the first `{` to the last `}`
pub struct BraceSpan;

impl ParseStrategy for BraceSpan {
    fn name(&self) -> &'static str {
        "brace-span"
    }

    fn candidate<'a>(&self, response: &'a str) -> Option<&'a str> {
        let first = response.find('{')?;
        let last = response.rfind('}')?;
        (last > first).then(|| &response[first..=last])
    }
}

/// The narrowest `{"ads": [...]}` object anywhere in the text
pub struct AdsPattern;

impl ParseStrategy for AdsPattern {
    fn name(&self) -> &'static str {
        "ads-pattern"
    }

    fn candidate<'a>(&self, response: &'a str) -> Option<&'a str> {
        ADS_OBJECT.find(response).map(|m| m.as_str())
    }
}

/// Ordered chain of parse strategies
pub struct ResponseParser {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(FencedBlock), Box::new(BraceSpan), Box::new(AdsPattern)],
        }
    }
}

impl ResponseParser {
    /// Parser with a custom strategy chain
    pub fn with_strategies(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self { strategies }
    }

    /// Recover ad records, or an empty list if no strategy succeeds
    pub fn parse(&self, response: &str) -> Vec<AdRecord> {
        for strategy in &self.strategies {
            let Some(candidate) = strategy.candidate(response) else {
                continue;
            };
            match serde_json::from_str::<AdEnvelope>(candidate) {
                Ok(envelope) => {
                    debug!(strategy = strategy.name(), ads = envelope.ads.len(), "Parsed response");
                    return envelope.ads.into_iter().map(AdRecord::normalized).collect();
                }
                Err(e) => {
                    debug!(strategy = strategy.name(), error = %e, "Strategy failed");
                }
            }
        }

        if !response.trim().is_empty() {
            warn!(response_len = response.len(), "No structured ads found in response");
        }
        Vec::new()
    }
}

/// Parse with the default strategy chain
pub fn parse_ads(response: &str) -> Vec<AdRecord> {
    ResponseParser::default().parse(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_block() {
        let response = "Here you go:\n```json\n{\"ads\": [{\"advertiser\": \"Foo\", \"library_id\": \"123\"}]}\n```\nDone.";
        let ads = parse_ads(response);
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].advertiser.as_deref(), Some("Foo"));
        assert_eq!(ads[0].library_id(), Some("123"));
    }

    #[test]
    fn test_bare_fence() {
        let response = "```\n{\"ads\": [{\"library_id\": 42}]}\n```";
        let ads = parse_ads(response);
        assert_eq!(ads[0].library_id(), Some("42"));
    }

    #[test]
    fn test_prose_around_object() {
        let response = r#"Sure! I found these ads: {"ads": [{"advertiser": "A"}, {"advertiser": "B"}]} Let me know if you need more."#;
        let ads = parse_ads(response);
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[1].advertiser.as_deref(), Some("B"));
    }

    #[test]
    fn test_ads_pattern_after_brace_span_fails() {
        // The first-to-last brace span includes the stray `{note}` and is invalid
        let response = r#"{note} then {"ads": [{"advertiser": "Foo", "library_id": "9"}]} and {end}"#;
        let ads = parse_ads(response);
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].library_id(), Some("9"));
    }

    #[test]
    fn test_no_structured_data() {
        assert!(parse_ads("I could not find any ads in this text.").is_empty());
        assert!(parse_ads("").is_empty());
    }

    #[test]
    fn test_truncated_response() {
        assert!(parse_ads(r#"{"ads": [{"advertiser": "Foo", "library_id": "1"#).is_empty());
    }

    #[test]
    fn test_wrong_envelope_is_empty() {
        assert!(parse_ads(r#"{"results": [{"advertiser": "Foo"}]}"#).is_empty());
        assert!(parse_ads(r#"[{"advertiser": "Foo"}]"#).is_empty());
    }

    #[test]
    fn test_non_object_record_fails_whole_payload() {
        assert!(parse_ads(r#"{"ads": [{"advertiser": "Foo"}, "oops"]}"#).is_empty());
    }

    #[test]
    fn test_duplicate_keys_do_not_panic() {
        let ads = parse_ads(r#"{"ads": [{"advertiser": "A", "advertiser": "B"}]}"#);
        assert!(ads.len() <= 1);
    }

    #[test]
    fn test_records_are_normalized() {
        let preview = "x".repeat(500);
        let response = format!(r#"{{"ads": [{{"content_preview": "{}"}}]}}"#, preview);
        let ads = parse_ads(&response);
        assert_eq!(
            ads[0].content_preview.as_ref().map(|p| p.chars().count()),
            Some(adscout_domain::CONTENT_PREVIEW_MAX_CHARS)
        );
    }

    #[test]
    fn test_custom_strategy_chain() {
        let parser = ResponseParser::with_strategies(vec![Box::new(FencedBlock)]);
        let response = r#"noise {"ads": [{"advertiser": "X"}]} noise"#;
        assert!(parser.parse(response).is_empty());

        let parser = ResponseParser::with_strategies(vec![Box::new(AdsPattern)]);
        let response = r#"noise {"ads": [{"advertiser": "X"}]} noise"#;
        assert_eq!(parser.parse(response).len(), 1);
    }
}
