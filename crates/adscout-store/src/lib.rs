//! AdScout Storage Layer
//!
//! Implements the LeadStore trait on SQLite.
//!
//! # Architecture
//!
//! - One row per lead, keyed by a unique library identifier
//! - Tags kept as JSON text, review notes in a child table
//! - Writes run in `BEGIN IMMEDIATE` transactions behind a busy timeout, so
//!   separate processes sharing one database file take turns
//!
//! # Examples
//!
//! ```no_run
//! use adscout_store::SqliteLeadStore;
//!
//! let store = SqliteLeadStore::new("adscout.db").unwrap();
//! // Store is now ready for lead operations
//! ```

#![warn(missing_docs)]

use adscout_domain::traits::{LeadStats, LeadStore, UpsertOutcome};
use adscout_domain::{DerivedMetrics, Lead, LeadStatus, Level, Note};
use chrono::{DateTime, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{ToSqlOutput, Type, Value};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, ToSql, TransactionBehavior,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// How long a writer waits for another process to release the database
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of leads returned by `search`
pub const SEARCH_LIMIT: usize = 20;

const LEAD_COLUMNS: &str = "library_id, advertiser, facebook_link, website_link, contact,
    start_date, active_time, content_preview, delivery_cost_inside, delivery_cost_outside,
    probability, service, reasoning, issues, estimated_daily_orders, ad_spend_intensity,
    cart_abandon_risk, estimated_monthly_revenue, dm_open_rate_prediction, status, tags,
    pitch, outreach_link, created_at, updated_at, version";

/// Columns every upsert rewrites, bound in this order right after the library id
const REFRESHED_COLUMNS: [&str; 21] = [
    "advertiser",
    "facebook_link",
    "website_link",
    "contact",
    "start_date",
    "active_time",
    "content_preview",
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
    "tags",
    "pitch",
    "outreach_link",
];

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Tags could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of LeadStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteLeadStore instance.
pub struct SqliteLeadStore {
    conn: Connection,
}

impl SqliteLeadStore {
    /// Open (or create) the lead database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&conn)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Every lead, highest probability first
    pub fn all_leads(&self) -> Result<Vec<Lead>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leads ORDER BY probability DESC, created_at DESC",
            LEAD_COLUMNS
        );
        self.query_leads(&sql, params![])
    }

    fn query_leads(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Lead>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut leads = stmt
            .query_map(params, lead_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for lead in &mut leads {
            lead.notes = load_notes(&self.conn, &lead.library_id)?;
        }
        Ok(leads)
    }
}

impl LeadStore for SqliteLeadStore {
    type Error = StoreError;

    fn upsert(&mut self, lead: &Lead) -> Result<UpsertOutcome, Self::Error> {
        let library_id = lead.library_id.trim();
        if library_id.is_empty() {
            return Err(StoreError::InvalidData("lead has no library id".to_string()));
        }
        if lead.advertiser.trim().is_empty() {
            return Err(StoreError::InvalidData(format!(
                "lead {} has no advertiser",
                library_id
            )));
        }

        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing_tags: Option<String> = tx
            .query_row(
                "SELECT tags FROM leads WHERE library_id = ?1",
                params![library_id],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing_tags {
            None => {
                let tags_json = serde_json::to_string(&lead.tags)?;
                let mut values = vec![library_id.to_sql()?];
                values.extend(refreshed_values(lead, &tags_json)?);
                values.extend([
                    lead.status.as_str().to_sql()?,
                    lead.created_at.to_sql()?,
                    now.to_sql()?,
                ]);
                tx.execute(&insert_sql(), params_from_iter(values))?;
                for note in &lead.notes {
                    insert_note(&tx, library_id, note)?;
                }
                debug!(library_id, "Inserted lead");
                UpsertOutcome { saved: 1, updated: 0 }
            }
            Some(tags_json) => {
                let mut tags: BTreeSet<String> = serde_json::from_str(&tags_json)?;
                tags.extend(lead.tags.iter().cloned());
                let tags_json = serde_json::to_string(&tags)?;

                // Review state (status, notes, created_at) belongs to the reviewer
                let mut values = vec![library_id.to_sql()?];
                values.extend(refreshed_values(lead, &tags_json)?);
                values.push(now.to_sql()?);
                tx.execute(&update_sql(), params_from_iter(values))?;
                debug!(library_id, "Refreshed lead");
                UpsertOutcome { saved: 0, updated: 1 }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn get_lead(&self, library_id: &str) -> Result<Option<Lead>, Self::Error> {
        let lead = self
            .conn
            .query_row(
                &format!("SELECT {} FROM leads WHERE library_id = ?1", LEAD_COLUMNS),
                params![library_id.trim()],
                lead_from_row,
            )
            .optional()?;

        match lead {
            Some(mut lead) => {
                lead.notes = load_notes(&self.conn, &lead.library_id)?;
                Ok(Some(lead))
            }
            None => Ok(None),
        }
    }

    fn get_high_priority(
        &self,
        min_probability: u8,
        limit: usize,
    ) -> Result<Vec<Lead>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM leads
             WHERE probability >= ?1
               AND contact IS NOT NULL AND TRIM(contact) != ''
               AND status != ?2
             ORDER BY probability DESC, created_at DESC
             LIMIT ?3",
            LEAD_COLUMNS
        );
        self.query_leads(
            &sql,
            params![min_probability, LeadStatus::Client.as_str(), limit as i64],
        )
    }

    fn update_status(
        &mut self,
        library_id: &str,
        status: LeadStatus,
        note: Option<&str>,
    ) -> Result<bool, Self::Error> {
        let library_id = library_id.trim();
        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE leads SET status = ?2, updated_at = ?3, version = version + 1
             WHERE library_id = ?1",
            params![library_id, status.as_str(), now],
        )?;
        if changed == 0 {
            return Ok(false);
        }

        if let Some(text) = note.map(str::trim).filter(|t| !t.is_empty()) {
            insert_note(&tx, library_id, &Note { text: text.to_string(), at: now })?;
        }

        tx.commit()?;
        debug!(library_id, status = %status, "Updated lead status");
        Ok(true)
    }

    fn search(&self, query: &str) -> Result<Vec<Lead>, Self::Error> {
        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));
        let sql = format!(
            "SELECT {} FROM leads
             WHERE unicode_lower(advertiser) LIKE ?1 ESCAPE '\\'
                OR unicode_lower(COALESCE(contact, '')) LIKE ?1 ESCAPE '\\'
             ORDER BY probability DESC, created_at DESC
             LIMIT ?2",
            LEAD_COLUMNS
        );
        self.query_leads(&sql, params![pattern, SEARCH_LIMIT as i64])
    }

    fn get_stats(&self) -> Result<LeadStats, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stats = LeadStats::default();
        for (name, count) in rows {
            let status = LeadStatus::parse(&name)
                .ok_or_else(|| StoreError::InvalidData(format!("Unknown status: {}", name)))?;
            let count = count as usize;
            stats.by_status.insert(status, count);
            stats.total += count;
        }
        Ok(stats)
    }
}

/// SQLite's own LOWER() and LIKE only fold ASCII letters
fn register_functions(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )?;
    Ok(())
}

fn insert_sql() -> String {
    let placeholders: Vec<String> = (1..=REFRESHED_COLUMNS.len() + 4)
        .map(|i| format!("?{}", i))
        .collect();
    format!(
        "INSERT INTO leads (library_id, {}, status, created_at, updated_at, version)
         VALUES ({}, 1)",
        REFRESHED_COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql() -> String {
    let assignments: Vec<String> = REFRESHED_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 2))
        .collect();
    format!(
        "UPDATE leads SET {}, updated_at = ?{}, version = version + 1 WHERE library_id = ?1",
        assignments.join(", "),
        REFRESHED_COLUMNS.len() + 2
    )
}

/// Values for `REFRESHED_COLUMNS`, in the same order
fn refreshed_values<'a>(
    lead: &'a Lead,
    tags_json: &'a str,
) -> rusqlite::Result<[ToSqlOutput<'a>; 21]> {
    let metrics = &lead.metrics;
    Ok([
        lead.advertiser.trim().to_sql()?,
        lead.facebook_link.to_sql()?,
        lead.website_link.to_sql()?,
        lead.contact.to_sql()?,
        lead.start_date.to_sql()?,
        lead.active_time.to_sql()?,
        lead.content_preview.to_sql()?,
        lead.delivery_cost_inside.to_sql()?,
        lead.delivery_cost_outside.to_sql()?,
        ToSqlOutput::Owned(Value::Integer(i64::from(lead.probability.min(100)))),
        lead.service.to_sql()?,
        lead.reasoning.to_sql()?,
        lead.issues.to_sql()?,
        metrics.estimated_daily_orders.to_sql()?,
        metrics.ad_spend_intensity.as_str().to_sql()?,
        metrics.cart_abandon_risk.as_str().to_sql()?,
        metrics.estimated_monthly_revenue.to_sql()?,
        metrics.dm_open_rate_prediction.to_sql()?,
        tags_json.to_sql()?,
        lead.pitch.to_sql()?,
        lead.outreach_link.to_sql()?,
    ])
}

fn insert_note(conn: &Connection, library_id: &str, note: &Note) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO lead_notes (library_id, text, created_at) VALUES (?1, ?2, ?3)",
        params![library_id, note.text, note.at],
    )?;
    Ok(())
}

fn load_notes(conn: &Connection, library_id: &str) -> Result<Vec<Note>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT text, created_at FROM lead_notes WHERE library_id = ?1 ORDER BY id",
    )?;
    let notes = stmt
        .query_map(params![library_id], |row| {
            Ok(Note {
                text: row.get(0)?,
                at: row.get::<_, DateTime<Utc>>(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notes)
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Parse a text column, reporting unknown values as a conversion failure
fn parsed_column<T>(
    row: &Row<'_>,
    index: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(index)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            Box::new(StoreError::InvalidData(format!("Unexpected value: {}", raw))),
        )
    })
}

/// Build a lead from a row selected with `LEAD_COLUMNS`; notes are loaded separately
fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let tags_json: String = row.get(20)?;
    let tags: BTreeSet<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(20, Type::Text, Box::new(e)))?;

    Ok(Lead {
        library_id: row.get(0)?,
        advertiser: row.get(1)?,
        facebook_link: row.get(2)?,
        website_link: row.get(3)?,
        contact: row.get(4)?,
        start_date: row.get(5)?,
        active_time: row.get(6)?,
        content_preview: row.get(7)?,
        delivery_cost_inside: row.get(8)?,
        delivery_cost_outside: row.get(9)?,
        probability: Lead::clamp_probability(row.get(10)?),
        service: row.get(11)?,
        reasoning: row.get(12)?,
        issues: row.get(13)?,
        metrics: DerivedMetrics {
            estimated_daily_orders: row.get(14)?,
            ad_spend_intensity: parsed_column(row, 15, Level::parse)?,
            cart_abandon_risk: parsed_column(row, 16, Level::parse)?,
            estimated_monthly_revenue: row.get(17)?,
            dm_open_rate_prediction: row.get(18)?,
        },
        status: parsed_column(row, 19, LeadStatus::parse)?,
        tags,
        notes: Vec::new(),
        pitch: row.get(21)?,
        outreach_link: row.get(22)?,
        created_at: row.get(23)?,
        updated_at: row.get(24)?,
        version: row.get(25)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_statements_bind_every_refreshed_column() {
        let insert = insert_sql();
        assert!(insert.contains("?25") && !insert.contains("?26"));
        let update = update_sql();
        assert!(update.contains("outreach_link = ?22"));
        assert!(update.contains("updated_at = ?23"));
    }

    #[test]
    fn test_unicode_lower_function() {
        let store = SqliteLeadStore::new(":memory:").unwrap();
        let lowered: String = store
            .conn
            .query_row("SELECT unicode_lower('ÉCOLE ÖZEL')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "école özel");
    }

    #[test]
    fn test_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.db");
        SqliteLeadStore::new(&path).unwrap();
        assert!(SqliteLeadStore::new(&path).is_ok());
    }
}
