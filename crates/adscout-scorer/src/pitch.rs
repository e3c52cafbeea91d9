//! Outreach pitch and WhatsApp deep link

use adscout_domain::Lead;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

/// Characters left as-is in the `text` query parameter
const PITCH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

static LOAD_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)load time:\s*([0-9]+(?:\.[0-9]+)?)s").expect("valid load time pattern"));

/// Normalize a contact into an international Bangladeshi mobile number
///
/// `880XXXXXXXXXX` is kept, `0XXXXXXXXXX` gains the country code, anything
/// else has no usable number.
pub fn clean_phone(contact: &str) -> Option<String> {
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 13 && digits.starts_with("880") {
        Some(digits)
    } else if digits.len() == 11 && digits.starts_with('0') {
        Some(format!("880{}", &digits[1..]))
    } else {
        None
    }
}

/// Draft the first outreach message for a lead
pub fn draft_pitch(lead: &Lead) -> String {
    let metrics = &lead.metrics;
    let (orders, revenue) = if metrics.estimated_daily_orders == "Unknown" {
        ("৫–১৫ অর্ডার/দিন".to_string(), "১–৩ লাখ/মাস".to_string())
    } else {
        let revenue = metrics
            .estimated_monthly_revenue
            .replace('৳', "")
            .replace("< 150K", "১.৫ লাখের নিচে")
            .trim()
            .to_string();
        (metrics.estimated_daily_orders.clone(), revenue)
    };

    let issues = lead.issues.to_lowercase();
    let mut pitch = format!("সালামু আলাইকুম, {}!\n\n", lead.advertiser);

    if let Some(caps) = LOAD_TIME.captures(&lead.issues) {
        pitch.push_str(&format!(
            "আপনার সাইট {}s লোড → মোবাইলে ৪০% কাস্টমার হারাচ্ছেন\n",
            &caps[1]
        ));
    }
    if issues.contains("no https") {
        pitch.push_str("সাইট 'Not Secure' দেখাচ্ছে → কাস্টমার ভরসা হারাচ্ছে\n");
    }
    if issues.contains("missing headers") {
        pitch.push_str("হ্যাকাররা আপনার সাইটে ঢুকতে পারে — সিকিউরিটি হোল আছে\n");
    }
    if lead.website_link.is_none() {
        pitch.push_str("আপনি FB-এ বিক্রি করছেন — কিন্তু অর্ডার ম্যানুয়াল? AI দিয়ে অটো করুন!\n");
    }

    pitch.push_str(&format!(
        "\nআপনার দোকানে ~{} ({}) — আমরা ৭ দিনে:\n",
        orders, revenue
    ));
    pitch.push_str("লোড টাইম ২ সেকেন্ডে নামাব\n");
    pitch.push_str("হ্যাক প্রুফ + SSL + সিকিউরিটি ফিক্স\n");
    pitch.push_str("৩০% বেশি সেল\n\n");
    pitch.push_str("প্রথম অডিট ফ্রি। ১৫ মিনিট কল?");

    pitch.trim().to_string()
}

/// WhatsApp link that opens a chat with `phone` pre-filled with `pitch`
pub fn outreach_link(phone: &str, pitch: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone,
        utf8_percent_encode(pitch, PITCH_ENCODE_SET)
    )
}

/// Pitch text plus a link when the contact holds a usable number
pub fn pitch_and_link(lead: &Lead) -> (String, Option<String>) {
    let pitch = draft_pitch(lead);
    let link = lead
        .contact
        .as_deref()
        .and_then(clean_phone)
        .map(|phone| outreach_link(&phone, &pitch));
    (pitch, link)
}
