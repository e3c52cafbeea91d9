//! CSV export of leads for manual review.
//!
//! The file is regenerated whole on every run.

use crate::error::Result;
use adscout_domain::Lead;
use std::fs;
use std::path::Path;
use tracing::info;

/// Column headers, in output order
pub const CSV_COLUMNS: [&str; 21] = [
    "library_id",
    "advertiser",
    "facebook_link",
    "website_link",
    "contact",
    "start_date",
    "active_time",
    "delivery_cost_inside",
    "delivery_cost_outside",
    "probability",
    "service",
    "reasoning",
    "issues",
    "estimated_daily_orders",
    "ad_spend_intensity",
    "cart_abandon_risk",
    "estimated_monthly_revenue",
    "dm_open_rate_prediction",
    "status",
    "pitch",
    "outreach_link",
];

/// Render leads as CSV text
pub fn leads_to_csv(leads: &[Lead]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_COLUMNS.iter().copied());

    for lead in leads {
        let probability = lead.probability.to_string();
        let intensity = lead.metrics.ad_spend_intensity.to_string();
        let risk = lead.metrics.cart_abandon_risk.to_string();
        let row: [&str; 21] = [
            &lead.library_id,
            &lead.advertiser,
            lead.facebook_link.as_deref().unwrap_or_default(),
            lead.website_link.as_deref().unwrap_or_default(),
            lead.contact.as_deref().unwrap_or_default(),
            lead.start_date.as_deref().unwrap_or_default(),
            lead.active_time.as_deref().unwrap_or_default(),
            lead.delivery_cost_inside.as_deref().unwrap_or_default(),
            lead.delivery_cost_outside.as_deref().unwrap_or_default(),
            &probability,
            &lead.service,
            &lead.reasoning,
            &lead.issues,
            &lead.metrics.estimated_daily_orders,
            &intensity,
            &risk,
            &lead.metrics.estimated_monthly_revenue,
            &lead.metrics.dm_open_rate_prediction,
            lead.status.as_str(),
            &lead.pitch,
            lead.outreach_link.as_deref().unwrap_or_default(),
        ];
        push_row(&mut out, row);
    }

    out
}

/// Write every lead to `path`, replacing any previous export
pub fn write_csv(path: &Path, leads: &[Lead]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, leads_to_csv(leads))?;
    info!(path = %path.display(), leads = leads.len(), "Exported leads");
    Ok(leads.len())
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

/// Quote a field when it holds a separator, quote or line break
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
