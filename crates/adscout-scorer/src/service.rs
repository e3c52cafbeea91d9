//! Recommended-service resolution

/// Name keywords and the category they imply, checked in order
const SERVICE_KEYWORDS: &[(&str, &str)] = &[
    ("grocery", "Grocery"),
    ("fashion", "Fashion"),
    ("clothing", "Fashion"),
    ("wear", "Fashion"),
    ("boot", "Footwear"),
    ("shoe", "Footwear"),
    ("watch", "Accessories"),
    ("book", "Books"),
    ("cafe", "F&B"),
    ("restaurant", "F&B"),
    ("cosmetic", "Beauty"),
    ("electronics", "Electronics"),
    ("gadget", "Electronics"),
    ("ceramic", "Home Decor"),
    ("furniture", "Home Decor"),
];

/// Service words that make a website probe worthwhile
const PROBE_KEYWORDS: &[&str] = &["security", "maintenance", "audit", "ssl"];

/// Category implied by the advertiser name, if any keyword matches
pub fn infer_service_from_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    SERVICE_KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, service)| *service)
}

/// Pick the service for a lead; the result is never empty
///
/// A proposed service is used unless it is blank, `unknown` or `none`.
/// Otherwise the advertiser name decides, then `default_service`.
pub fn resolve_service(proposed: Option<&str>, advertiser: &str, default_service: &str) -> String {
    let proposed = proposed.map(str::trim).unwrap_or_default();
    let inconclusive = proposed.is_empty()
        || proposed.eq_ignore_ascii_case("unknown")
        || proposed.eq_ignore_ascii_case("none");

    if !inconclusive {
        return title_case(proposed);
    }

    match infer_service_from_name(advertiser) {
        Some(service) => service.to_string(),
        None if !default_service.trim().is_empty() => default_service.trim().to_string(),
        None => "E-commerce".to_string(),
    }
}

/// Whether this service is about securing or maintaining a site
pub fn needs_website_probe(service: &str) -> bool {
    let service = service.to_lowercase();
    PROBE_KEYWORDS.iter().any(|keyword| service.contains(keyword))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(infer_service_from_name("Dhaka Fashion House"), Some("Fashion"));
        assert_eq!(infer_service_from_name("Shoe Corner BD"), Some("Footwear"));
        assert_eq!(infer_service_from_name("মিনি ফ্যান শপ"), None);
    }

    #[test]
    fn test_proposed_service_wins() {
        assert_eq!(
            resolve_service(Some("security audit"), "Fashion Hub", "E-commerce"),
            "Security Audit"
        );
    }

    #[test]
    fn test_inconclusive_service_falls_back() {
        for proposed in [None, Some(""), Some("  "), Some("Unknown"), Some("none")] {
            assert_eq!(resolve_service(proposed, "Gadget Point", "E-commerce"), "Electronics");
            assert_eq!(resolve_service(proposed, "Mini Fan BD", "E-commerce"), "E-commerce");
        }
    }

    #[test]
    fn test_service_never_empty() {
        assert_eq!(resolve_service(None, "", ""), "E-commerce");
    }

    #[test]
    fn test_probe_gate() {
        assert!(needs_website_probe("Security Audits For Websites"));
        assert!(needs_website_probe("SSL setup"));
        assert!(needs_website_probe("E-commerce website maintenance"));
        assert!(!needs_website_probe("AI Automation"));
        assert!(!needs_website_probe("Fashion"));
    }
}
