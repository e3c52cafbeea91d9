//! Raw ad records and the persisted record set

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// Upper bound on `content_preview`, in characters
pub const CONTENT_PREVIEW_MAX_CHARS: usize = 200;

/// One ad as recovered from a chunk of scraped text
///
/// Every field may be missing: the generative service only reports what it
/// found in the chunk and nothing is filled in after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRecord {
    /// Advertiser (page) name
    #[serde(default, deserialize_with = "lenient_string")]
    pub advertiser: Option<String>,

    /// Link to the advertiser's Facebook page
    #[serde(default, deserialize_with = "lenient_string")]
    pub advertiser_facebook_link: Option<String>,

    /// Link to the advertiser's own website
    #[serde(default, deserialize_with = "lenient_string")]
    pub advertiser_website_link: Option<String>,

    /// Ad Library identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub library_id: Option<String>,

    /// Date the ad started running
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,

    /// Active time description ("Active for 3 days")
    #[serde(default, deserialize_with = "lenient_string")]
    pub active_time: Option<String>,

    /// First part of the ad copy
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_preview: Option<String>,

    /// Phone number or other contact handle
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,

    /// Delivery charge inside the advertiser's city
    #[serde(default, deserialize_with = "lenient_string")]
    pub delivery_cost_inside: Option<String>,

    /// Delivery charge outside the advertiser's city
    #[serde(default, deserialize_with = "lenient_string")]
    pub delivery_cost_outside: Option<String>,
}

impl AdRecord {
    /// Library identifier, if the record carries one
    pub fn library_id(&self) -> Option<&str> {
        self.library_id.as_deref()
    }

    /// Bound the content preview to [`CONTENT_PREVIEW_MAX_CHARS`]
    pub fn normalized(mut self) -> Self {
        if let Some(preview) = self.content_preview.as_mut() {
            if preview.chars().count() > CONTENT_PREVIEW_MAX_CHARS {
                *preview = preview.chars().take(CONTENT_PREVIEW_MAX_CHARS).collect();
            }
        }
        self
    }
}

/// Accepts strings, numbers and booleans; blank strings become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let text = match v {
            Loose::Text(s) => s.trim().to_string(),
            Loose::Unsigned(n) => n.to_string(),
            Loose::Signed(n) => n.to_string(),
            Loose::Float(n) => n.to_string(),
            Loose::Flag(b) => b.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }))
}

/// Deduplicated accumulation of ad records across runs
///
/// Invariant: no two records share a non-null library identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Number of records in `ads`
    #[serde(default)]
    pub total_ads: usize,

    /// Records in discovery order
    #[serde(default)]
    pub ads: Vec<AdRecord>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    /// Library identifiers already present
    pub fn library_ids(&self) -> HashSet<String> {
        self.ads
            .iter()
            .filter_map(|ad| ad.library_id.clone())
            .collect()
    }

    /// Append the records whose library identifier is not yet present.
    ///
    /// Records without an identifier are always appended; there is no key to
    /// compare them by. Returns the number of records appended.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = AdRecord>) -> usize {
        let mut seen = self.library_ids();
        let before = self.ads.len();

        for record in candidates {
            match record.library_id.as_deref() {
                Some(id) if seen.contains(id) => continue,
                Some(id) => {
                    seen.insert(id.to_string());
                    self.ads.push(record);
                }
                None => self.ads.push(record),
            }
        }

        self.total_ads = self.ads.len();
        self.ads.len() - before
    }

    /// Ad counts per advertiser, most active first
    pub fn advertiser_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for ad in &self.ads {
            let name = ad.advertiser.clone().unwrap_or_else(|| "Unknown".to_string());
            *counts.entry(name).or_default() += 1;
        }

        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(id: Option<&str>, advertiser: &str) -> AdRecord {
        AdRecord {
            advertiser: Some(advertiser.to_string()),
            library_id: id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_lenient_fields() {
        let json = r#"{
            "advertiser": "  Foo Shop ",
            "library_id": 123456789,
            "contact": "",
            "start_date": null
        }"#;
        let record: AdRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.advertiser.as_deref(), Some("Foo Shop"));
        assert_eq!(record.library_id(), Some("123456789"));
        assert_eq!(record.contact, None);
        assert_eq!(record.start_date, None);
        assert_eq!(record.advertiser_website_link, None);
    }

    #[test]
    fn test_preview_truncated() {
        let record = AdRecord {
            content_preview: Some("অ".repeat(CONTENT_PREVIEW_MAX_CHARS + 50)),
            ..Default::default()
        }
        .normalized();
        let preview = record.content_preview.unwrap();
        assert_eq!(preview.chars().count(), CONTENT_PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_merge_drops_known_ids() {
        let mut set = RecordSet::new();
        assert_eq!(set.merge(vec![ad(Some("1"), "A"), ad(Some("2"), "B")]), 2);
        assert_eq!(set.merge(vec![ad(Some("2"), "B"), ad(Some("3"), "C")]), 1);
        assert_eq!(set.len(), 3);
        assert_eq!(set.total_ads, 3);
    }

    #[test]
    fn test_merge_dedups_within_batch() {
        let mut set = RecordSet::new();
        let added = set.merge(vec![ad(Some("7"), "A"), ad(Some("7"), "A copy")]);
        assert_eq!(added, 1);
        assert_eq!(set.ads[0].advertiser.as_deref(), Some("A"));
    }

    #[test]
    fn test_merge_keeps_records_without_id() {
        let mut set = RecordSet::new();
        set.merge(vec![ad(None, "A")]);
        let added = set.merge(vec![ad(None, "A")]);
        assert_eq!(added, 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_advertiser_counts() {
        let mut set = RecordSet::new();
        set.merge(vec![
            ad(Some("1"), "A"),
            ad(Some("2"), "B"),
            ad(Some("3"), "B"),
        ]);
        let counts = set.advertiser_counts();
        assert_eq!(counts[0], ("B".to_string(), 2));
        assert_eq!(counts[1], ("A".to_string(), 1));
    }

    #[test]
    fn test_record_set_file_shape() {
        let mut set = RecordSet::new();
        set.merge(vec![ad(Some("1"), "A")]);
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["total_ads"], 1);
        assert_eq!(value["ads"][0]["library_id"], "1");
        assert!(value["ads"][0]["contact"].is_null());
    }
}
