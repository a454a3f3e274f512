// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Cotiza.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use cotiza_types::{QuoteRecord, QuoteStatus, QuoteSummary};
use parking_lot::Mutex;
use rusqlite::{OptionalExtension, params};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug)]
pub struct Database {
    conn: Mutex<rusqlite::Connection>,
}

/// Fixed-width UTC timestamps so stored values order lexically
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid stored timestamp: {value}"))?
        .with_timezone(&Utc))
}

/// Raw `quotes` columns before decoding
struct QuoteRow {
    id: String,
    created_at: String,
    valid_until: String,
    status: String,
    request_json: String,
    design_json: String,
}

impl QuoteRow {
    fn into_record(self) -> Result<QuoteRecord> {
        Ok(QuoteRecord {
            quote_id: Uuid::parse_str(&self.id)
                .with_context(|| format!("Invalid stored quote id: {}", self.id))?,
            request: serde_json::from_str(&self.request_json)
                .context("Failed to decode stored quote request")?,
            design: serde_json::from_str(&self.design_json)
                .context("Failed to decode stored system design")?,
            created_at: parse_timestamp(&self.created_at)?,
            valid_until: parse_timestamp(&self.valid_until)?,
            status: self.status.parse()?,
        })
    }
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open database: {path}"))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS quotes (
                id                TEXT PRIMARY KEY,
                created_at        TEXT NOT NULL,
                valid_until       TEXT NOT NULL,
                status            TEXT NOT NULL DEFAULT 'pending',
                customer_name     TEXT NOT NULL,
                customer_email    TEXT,
                location          TEXT NOT NULL,
                system_power_kw   REAL NOT NULL,
                total_investment  REAL NOT NULL,
                request_json      TEXT NOT NULL,
                design_json       TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_quotes_created
                ON quotes(created_at DESC);

            CREATE TABLE IF NOT EXISTS notification_log (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                quote_id       TEXT NOT NULL,
                event_type     TEXT NOT NULL,
                sent_at        TEXT NOT NULL,
                recipients     TEXT NOT NULL
            );",
        )
        .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn insert_quote(&self, record: &QuoteRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO quotes (id, created_at, valid_until, status, customer_name, customer_email, location, system_power_kw, total_investment, request_json, design_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.quote_id.to_string(),
                timestamp(record.created_at),
                timestamp(record.valid_until),
                record.status.to_config_value(),
                record.request.customer.name,
                record.request.customer.email,
                record.design.location.key,
                record.design.system_power_kw,
                record.design.costs.total_investment,
                serde_json::to_string(&record.request)?,
                serde_json::to_string(&record.design)?,
            ],
        )?;
        Ok(())
    }

    pub fn get_quote(&self, id: Uuid) -> Result<Option<QuoteRecord>> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT id, created_at, valid_until, status, request_json, design_json
                 FROM quotes WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok(QuoteRow {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                        valid_until: row.get(2)?,
                        status: row.get(3)?,
                        request_json: row.get(4)?,
                        design_json: row.get(5)?,
                    })
                },
            )
            .optional()?
        };
        row.map(QuoteRow::into_record).transpose()
    }

    /// Newest first, with the total row count
    pub fn list_quotes(&self, limit: u32, offset: u32) -> Result<(Vec<QuoteSummary>, u64)> {
        let conn = self.conn.lock();
        let total: u64 = conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT id, customer_name, location, system_power_kw, total_investment, status, created_at, valid_until
             FROM quotes ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
            .query_map(params![limit, offset], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let summaries = rows
            .into_iter()
            .map(
                |(id, customer_name, location, power, investment, status, created, valid)| {
                    Ok(QuoteSummary {
                        quote_id: Uuid::parse_str(&id)?,
                        customer_name,
                        location,
                        system_power_kw: power,
                        total_investment: investment,
                        status: status.parse()?,
                        created_at: parse_timestamp(&created)?,
                        valid_until: parse_timestamp(&valid)?,
                    })
                },
            )
            .collect::<Result<Vec<_>>>()?;

        Ok((summaries, total))
    }

    /// Returns whether a quote was removed
    pub fn delete_quote(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM quotes WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    pub fn update_status(&self, id: Uuid, status: QuoteStatus) -> Result<bool> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE quotes SET status = ?1 WHERE id = ?2",
            params![status.to_config_value(), id.to_string()],
        )?;
        Ok(updated > 0)
    }

    /// Flag open quotes past their validity window
    pub fn mark_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE quotes SET status = 'expired'
             WHERE valid_until < ?1 AND status IN ('pending', 'sent')",
            params![timestamp(now)],
        )?;
        Ok(updated as u64)
    }

    /// Delete expired quotes whose validity ended more than `retention_days` ago
    pub fn cleanup_expired(&self, now: DateTime<Utc>, retention_days: u32) -> Result<u64> {
        let conn = self.conn.lock();
        let cutoff = now - chrono::Duration::days(i64::from(retention_days));
        let deleted = conn.execute(
            "DELETE FROM quotes WHERE status = 'expired' AND valid_until < ?1",
            params![timestamp(cutoff)],
        )?;
        Ok(deleted as u64)
    }

    pub fn log_notification(
        &self,
        quote_id: Uuid,
        event_type: &str,
        recipients: &[String],
    ) -> Result<()> {
        let conn = self.conn.lock();
        let recipients_json = serde_json::to_string(recipients)?;
        conn.execute(
            "INSERT INTO notification_log (quote_id, event_type, sent_at, recipients) VALUES (?1, ?2, ?3, ?4)",
            params![quote_id.to_string(), event_type, timestamp(Utc::now()), recipients_json],
        )?;
        Ok(())
    }

    pub fn notification_count(&self, quote_id: Uuid) -> Result<u64> {
        let conn = self.conn.lock();
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM notification_log WHERE quote_id = ?1",
            params![quote_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cotiza_core::{InMemoryCatalog, SolarCalculator};
    use cotiza_types::{InstallationType, QuoteRequest, TariffType};

    fn record(name: &str, created_at: DateTime<Utc>) -> QuoteRecord {
        let mut request = QuoteRequest::new(
            "cordoba",
            420.0,
            TariffType::Residential,
            50.0,
            InstallationType::ResidentialRoof,
        );
        request.customer.name = name.to_owned();
        request.customer.email = Some(format!("{}@example.com", name.to_lowercase()));
        let design = SolarCalculator::default()
            .size_system(&request, &InMemoryCatalog::with_defaults())
            .unwrap();
        QuoteRecord::new(request, design, created_at, 30)
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let db = Database::open(":memory:").unwrap();
        let quote = record("Lucia", Utc::now());
        db.insert_quote(&quote).unwrap();

        let loaded = db.get_quote(quote.quote_id).unwrap().unwrap();
        assert_eq!(loaded.quote_id, quote.quote_id);
        assert_eq!(loaded.request, quote.request);
        assert_eq!(loaded.design.panel_count(), quote.design.panel_count());
        assert_eq!(
            loaded.design.inverters.item.identity,
            quote.design.inverters.item.identity
        );
        assert!(
            (loaded.design.costs.total_investment - quote.design.costs.total_investment).abs()
                < 1e-6
        );
        assert_eq!(loaded.status, QuoteStatus::Pending);

        assert!(db.get_quote(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_list_is_newest_first_and_paginated() {
        let db = Database::open(":memory:").unwrap();
        let base = Utc::now() - Duration::days(3);
        for (i, name) in ["Ana", "Bruno", "Carla"].iter().enumerate() {
            db.insert_quote(&record(name, base + Duration::hours(i64::try_from(i).unwrap())))
                .unwrap();
        }

        let (page, total) = db.list_quotes(2, 0).unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].customer_name, "Carla");
        assert_eq!(page[1].customer_name, "Bruno");

        let (page, _) = db.list_quotes(2, 2).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].customer_name, "Ana");
        assert_eq!(page[0].location, "cordoba");
    }

    #[test]
    fn test_delete_and_update_status() {
        let db = Database::open(":memory:").unwrap();
        let quote = record("Diego", Utc::now());
        db.insert_quote(&quote).unwrap();

        assert!(db.update_status(quote.quote_id, QuoteStatus::Accepted).unwrap());
        let loaded = db.get_quote(quote.quote_id).unwrap().unwrap();
        assert_eq!(loaded.status, QuoteStatus::Accepted);

        assert!(db.delete_quote(quote.quote_id).unwrap());
        assert!(!db.delete_quote(quote.quote_id).unwrap());
        assert!(!db.update_status(quote.quote_id, QuoteStatus::Sent).unwrap());
    }

    #[test]
    fn test_expiry_and_cleanup() {
        let db = Database::open(":memory:").unwrap();
        let now = Utc::now();
        let old = record("Old", now - Duration::days(200));
        let stale = record("Stale", now - Duration::days(40));
        let fresh = record("Fresh", now - Duration::days(1));
        let accepted = record("Accepted", now - Duration::days(50));
        for quote in [&old, &stale, &fresh, &accepted] {
            db.insert_quote(quote).unwrap();
        }
        db.update_status(accepted.quote_id, QuoteStatus::Accepted)
            .unwrap();

        assert_eq!(db.mark_expired(now).unwrap(), 2);
        let loaded = db.get_quote(stale.quote_id).unwrap().unwrap();
        assert_eq!(loaded.status, QuoteStatus::Expired);
        let loaded = db.get_quote(fresh.quote_id).unwrap().unwrap();
        assert_eq!(loaded.status, QuoteStatus::Pending);

        // Only "Old" expired more than 90 days ago
        assert_eq!(db.cleanup_expired(now, 90).unwrap(), 1);
        assert!(db.get_quote(old.quote_id).unwrap().is_none());
        assert!(db.get_quote(stale.quote_id).unwrap().is_some());
        assert!(db.get_quote(accepted.quote_id).unwrap().is_some());
    }

    #[test]
    fn test_notification_log() {
        let db = Database::open(":memory:").unwrap();
        let id = Uuid::new_v4();
        db.log_notification(id, "sales", &["ventas@example.com".to_owned()])
            .unwrap();
        db.log_notification(id, "customer", &["cliente@example.com".to_owned()])
            .unwrap();
        assert_eq!(db.notification_count(id).unwrap(), 2);
        assert_eq!(db.notification_count(Uuid::new_v4()).unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cotiza.db");
        Database::open(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }
}
