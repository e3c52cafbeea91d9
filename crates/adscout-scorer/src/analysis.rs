//! Sales-fit analysis of a scraped Facebook page

use crate::config::ScoringConfig;
use adscout_domain::traits::LlmProvider;
use adscout_domain::Lead;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

static KEY_VALUE_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)"?Probability"?\s*[:=]\s*(\d+).*?"?Service"?\s*[:=]\s*["']?([^"\n]+)["']?.*?"?Reasoning"?\s*[:=]\s*["']?(.+?)["']?\s*$"#,
    )
    .expect("valid analysis pattern")
});

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a B2B sales analyst. We offer:
1. AI automation / automated bots
2. E-commerce website development + maintenance
3. Security audits for websites/apps
4. Securing + maintaining existing e-commerce sites

Analyze the Facebook page content below and respond in strict JSON:
{
  "Probability": <0-100>,
  "Service": "<exact service name>",
  "Reasoning": "<1-2 sentences>"
}

Be realistic: personal or inactive pages get a low probability."#;

/// How likely a page is to buy, and what
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageAnalysis {
    /// Purchase probability, 0-100
    pub probability: u8,

    /// Proposed service, `None` when inconclusive
    pub service: Option<String>,

    /// Short explanation
    pub reasoning: String,
}

impl PageAnalysis {
    /// Analysis that proposes nothing
    pub fn inconclusive(reasoning: impl Into<String>) -> Self {
        Self {
            probability: 0,
            service: None,
            reasoning: reasoning.into(),
        }
    }
}

/// Asks the generative service to judge a page
pub struct PageAnalyzer<L: LlmProvider> {
    llm: L,
    max_chars: usize,
    min_chars: usize,
}

impl<L: LlmProvider> PageAnalyzer<L> {
    /// Create an analyzer using the page-text limits from `config`
    pub fn new(llm: L, config: &ScoringConfig) -> Self {
        Self {
            llm,
            max_chars: config.page_text_max_chars,
            min_chars: config.page_text_min_chars,
        }
    }

    /// Analyze page text; failures come back as an inconclusive analysis
    pub async fn analyze(&self, page_text: &str) -> PageAnalysis {
        let page_text = page_text.trim();
        if page_text.chars().count() < self.min_chars {
            return PageAnalysis::inconclusive("Insufficient or empty page content.");
        }

        let excerpt: String = page_text.chars().take(self.max_chars).collect();
        let prompt = format!("{}\n\nPage content:\n{}", ANALYSIS_INSTRUCTIONS, excerpt);

        match self.llm.generate(&prompt).await {
            Ok(response) => parse_analysis(&response).unwrap_or_else(|| {
                debug!(response_len = response.len(), "Analysis response not understood");
                PageAnalysis::inconclusive("Parsing failed.")
            }),
            Err(e) => {
                warn!(error = %e, "Page analysis failed");
                PageAnalysis::inconclusive(format!("Analysis failed: {}", e))
            }
        }
    }
}

/// Read an analysis answer, as JSON or as loose `Key: value` text
pub fn parse_analysis(response: &str) -> Option<PageAnalysis> {
    parse_json_answer(response).or_else(|| parse_key_value_answer(response))
}

fn parse_json_answer(response: &str) -> Option<PageAnalysis> {
    let first = response.find('{')?;
    let last = response.rfind('}')?;
    if last <= first {
        return None;
    }

    let value: Value = serde_json::from_str(&response[first..=last]).ok()?;
    let object = value.as_object()?;
    let field = |name: &str| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    };

    let probability = match field("probability")? {
        Value::Number(n) => n.as_f64()?.round() as i64,
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok()?,
        _ => return None,
    };
    let service = field("service")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let reasoning = field("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(PageAnalysis {
        probability: Lead::clamp_probability(probability),
        service,
        reasoning,
    })
}

fn parse_key_value_answer(response: &str) -> Option<PageAnalysis> {
    let caps = KEY_VALUE_ANSWER.captures(response)?;
    let probability = caps[1].parse::<i64>().unwrap_or(i64::MAX);
    let service = caps[2].trim().trim_end_matches([',', '\'']).trim();

    Some(PageAnalysis {
        probability: Lead::clamp_probability(probability),
        service: (!service.is_empty()).then(|| service.to_string()),
        reasoning: caps[3].trim().to_string(),
    })
}
