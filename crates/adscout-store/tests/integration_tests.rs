//! Integration tests for adscout-store
//!
//! These tests verify the full review cycle for leads: upsert, lookup,
//! prioritisation, status changes with notes, search and statistics.

use adscout_domain::traits::{LeadStore, UpsertOutcome};
use adscout_domain::{Lead, LeadStatus, Level, Note};
use adscout_store::{SqliteLeadStore, StoreError, SEARCH_LIMIT};

fn lead(library_id: &str, advertiser: &str, probability: u8, contact: Option<&str>) -> Lead {
    let mut lead = Lead::new(advertiser, library_id, "E-commerce");
    lead.probability = probability;
    lead.contact = contact.map(str::to_string);
    lead.facebook_link = Some(format!("https://facebook.com/{}", advertiser.replace(' ', "")));
    lead.tags.insert("fb-ad".to_string());
    lead
}

fn store() -> SqliteLeadStore {
    SqliteLeadStore::new(":memory:").unwrap()
}

#[test]
fn test_store_initialization() {
    let store = SqliteLeadStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_upsert_and_get_lead() {
    let mut store = store();
    let mut fresh = lead("123", "Mini Fan BD", 72, Some("01712345678"));
    fresh.metrics.cart_abandon_risk = Level::Medium;
    fresh.pitch = "হ্যালো".to_string();

    let outcome = store.upsert(&fresh).unwrap();
    assert_eq!(outcome, UpsertOutcome { saved: 1, updated: 0 });

    let stored = store.get_lead("123").unwrap().expect("lead should exist");
    assert_eq!(stored.advertiser, "Mini Fan BD");
    assert_eq!(stored.probability, 72);
    assert_eq!(stored.metrics.cart_abandon_risk, Level::Medium);
    assert_eq!(stored.pitch, "হ্যালো");
    assert!(stored.tags.contains("fb-ad"));
    assert_eq!(stored.status, LeadStatus::New);
    assert_eq!(stored.version, 1);

    assert!(store.get_lead("999").unwrap().is_none());
}

#[test]
fn test_upsert_refreshes_but_keeps_review_state() {
    let mut store = store();
    store.upsert(&lead("123", "Shop", 40, Some("01712345678"))).unwrap();
    store
        .update_status("123", LeadStatus::Messaged, Some("sent pitch"))
        .unwrap();
    let before = store.get_lead("123").unwrap().unwrap();

    let mut refreshed = lead("123", "Shop", 85, Some("01712345678"));
    refreshed.status = LeadStatus::New;
    refreshed.tags.insert("rescored".to_string());
    let outcome = store.upsert(&refreshed).unwrap();
    assert_eq!(outcome, UpsertOutcome { saved: 0, updated: 1 });

    let after = store.get_lead("123").unwrap().unwrap();
    assert_eq!(after.probability, 85);
    assert_eq!(after.status, LeadStatus::Messaged);
    assert_eq!(after.notes.len(), 1);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.tags.contains("fb-ad") && after.tags.contains("rescored"));
    assert_eq!(after.version, before.version + 1);
}

#[test]
fn test_upsert_rejects_blank_library_id() {
    let mut store = store();
    let result = store.upsert(&lead("  ", "Shop", 50, None));
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn test_bulk_upsert_counts() {
    let mut store = store();
    store.upsert(&lead("1", "Existing", 10, None)).unwrap();

    let batch = vec![
        lead("1", "Existing", 20, None),
        lead("2", "New One", 30, None),
        lead("", "Broken", 30, None),
        lead("3", "New Two", 30, None),
    ];
    let summary = store.bulk_upsert(&batch);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(store.all_leads().unwrap().len(), 3);
}

#[test]
fn test_high_priority_filters_and_orders() {
    let mut store = store();
    store.upsert(&lead("a", "Seventy", 70, Some("01711111111"))).unwrap();
    store.upsert(&lead("b", "Ninety", 90, Some("01722222222"))).unwrap();
    store.upsert(&lead("c", "Client", 95, Some("01733333333"))).unwrap();
    store.upsert(&lead("d", "No Contact", 99, None)).unwrap();
    store.upsert(&lead("e", "Blank Contact", 99, Some("  "))).unwrap();
    store.upsert(&lead("f", "Too Low", 64, Some("01744444444"))).unwrap();
    store.update_status("c", LeadStatus::Client, None).unwrap();

    let top = store.get_high_priority(65, 5).unwrap();
    let ids: Vec<_> = top.iter().map(|l| l.library_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let limited = store.get_high_priority(65, 1).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].library_id, "b");
}

#[test]
fn test_update_status_appends_trimmed_note() {
    let mut store = store();
    store.upsert(&lead("123", "Shop", 50, None)).unwrap();

    assert!(store
        .update_status("123", LeadStatus::InTalk, Some("  asked for price  "))
        .unwrap());
    assert!(store
        .update_status("123", LeadStatus::InTalk, Some("   "))
        .unwrap());

    let stored = store.get_lead("123").unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::InTalk);
    assert_eq!(stored.notes.len(), 1);
    assert_eq!(stored.notes[0].text, "asked for price");
    assert_eq!(stored.version, 3);
}

#[test]
fn test_update_status_unknown_lead() {
    let mut store = store();
    let updated = store
        .update_status("nope", LeadStatus::Rejected, Some("note"))
        .unwrap();
    assert!(!updated);
}

#[test]
fn test_notes_survive_insert() {
    let mut store = store();
    let mut with_note = lead("123", "Shop", 50, None);
    with_note.notes.push(Note::now("imported"));
    store.upsert(&with_note).unwrap();

    let stored = store.get_lead("123").unwrap().unwrap();
    assert_eq!(stored.notes.len(), 1);
    assert_eq!(stored.notes[0].text, "imported");
}

#[test]
fn test_search_advertiser_and_contact() {
    let mut store = store();
    store.upsert(&lead("1", "Gadget Point", 50, Some("01711111111"))).unwrap();
    store.upsert(&lead("2", "Book Corner", 60, Some("01822222222"))).unwrap();
    store.upsert(&lead("3", "100% Cotton", 10, None)).unwrap();

    let by_name = store.search("gadget").unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].advertiser, "Gadget Point");

    let by_contact = store.search("0182").unwrap();
    assert_eq!(by_contact.len(), 1);
    assert_eq!(by_contact[0].library_id, "2");

    let literal_percent = store.search("100%").unwrap();
    assert_eq!(literal_percent.len(), 1);
    assert_eq!(store.search("%").unwrap().len(), 1);

    assert!(store.search("nothing").unwrap().is_empty());
}

#[test]
fn test_search_folds_non_ascii_case() {
    let mut store = store();
    store.upsert(&lead("1", "École Shop", 50, None)).unwrap();
    store.upsert(&lead("2", "ÖZEL Fashion", 40, None)).unwrap();
    store.upsert(&lead("3", "মিনি ফ্যান", 30, None)).unwrap();

    assert_eq!(store.search("École").unwrap().len(), 1);
    assert_eq!(store.search("école").unwrap().len(), 1);
    assert_eq!(store.search("ÉCOLE").unwrap().len(), 1);
    assert_eq!(store.search("ÖZEL").unwrap()[0].library_id, "2");
    assert_eq!(store.search("özel fash").unwrap()[0].library_id, "2");
    assert_eq!(store.search("ফ্যান").unwrap()[0].library_id, "3");
}

#[test]
fn test_search_limit() {
    let mut store = store();
    for i in 0..(SEARCH_LIMIT + 5) {
        store
            .upsert(&lead(&i.to_string(), &format!("Shop {}", i), 50, None))
            .unwrap();
    }
    assert_eq!(store.search("shop").unwrap().len(), SEARCH_LIMIT);
}

#[test]
fn test_stats() {
    let mut store = store();
    assert_eq!(store.get_stats().unwrap().total, 0);

    store.upsert(&lead("1", "A", 50, None)).unwrap();
    store.upsert(&lead("2", "B", 50, None)).unwrap();
    store.upsert(&lead("3", "C", 50, None)).unwrap();
    store.update_status("3", LeadStatus::Client, None).unwrap();

    let stats = store.get_stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_status.get(&LeadStatus::New), Some(&2));
    assert_eq!(stats.by_status.get(&LeadStatus::Client), Some(&1));
    assert_eq!(stats.by_status.get(&LeadStatus::Archived), None);
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.db");

    {
        let mut store = SqliteLeadStore::new(&path).unwrap();
        store.upsert(&lead("123", "Shop", 50, None)).unwrap();
        store
            .update_status("123", LeadStatus::Messaged, Some("hello"))
            .unwrap();
    }

    let store = SqliteLeadStore::new(&path).unwrap();
    let stored = store.get_lead("123").unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::Messaged);
    assert_eq!(stored.notes[0].text, "hello");
}

#[test]
fn test_two_connections_share_unique_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.db");
    let mut first = SqliteLeadStore::new(&path).unwrap();
    let mut second = SqliteLeadStore::new(&path).unwrap();

    assert_eq!(first.upsert(&lead("123", "Shop", 50, None)).unwrap().saved, 1);
    assert_eq!(second.upsert(&lead("123", "Shop", 60, None)).unwrap().updated, 1);
    assert_eq!(first.all_leads().unwrap().len(), 1);
}
