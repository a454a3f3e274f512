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

//! Background tasks: catalog sync from the materials table and quote expiry

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cotiza_core::{InMemoryCatalog, SharedCatalog};
use cotiza_types::HardwareRecord;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::nocodb::NocoDbClient;

/// Where fresh catalog records come from
#[async_trait]
pub trait MaterialsSource: Send + Sync {
    async fn fetch_materials(&self) -> anyhow::Result<Vec<HardwareRecord>>;
}

#[async_trait]
impl MaterialsSource for NocoDbClient {
    async fn fetch_materials(&self) -> anyhow::Result<Vec<HardwareRecord>> {
        Ok(Self::fetch_materials(self).await?)
    }
}

/// Fetch once and swap the snapshot in. An empty result keeps the current catalog.
pub async fn sync_catalog(
    source: &dyn MaterialsSource,
    catalog: &SharedCatalog,
) -> anyhow::Result<usize> {
    let records = source.fetch_materials().await?;
    let fresh = InMemoryCatalog::from_records(records).with_timestamp(Utc::now());

    if fresh.is_empty() {
        warn!("Materials source returned no valid records, keeping current catalog");
        return Ok(0);
    }

    let count = fresh.len();
    catalog.replace(fresh);
    info!(records = count, "Catalog snapshot replaced");
    Ok(count)
}

pub fn spawn_catalog_sync(
    source: Arc<dyn MaterialsSource>,
    catalog: SharedCatalog,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        info!(every_secs = every.as_secs(), "Catalog sync started");

        loop {
            interval.tick().await;
            if let Err(e) = sync_catalog(source.as_ref(), &catalog).await {
                error!(error = %e, "Catalog sync failed, keeping previous snapshot");
            }
        }
    })
}

/// Hourly: flag quotes past `valid_until`, then purge old expired ones
pub fn spawn_quote_maintenance(db: Arc<Database>, retention_days: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));

        loop {
            interval.tick().await;
            let now = Utc::now();

            match db.mark_expired(now) {
                Ok(marked) if marked > 0 => info!(marked, "Quotes marked as expired"),
                Err(e) => error!(error = %e, "Failed to mark expired quotes"),
                _ => {}
            }
            match db.cleanup_expired(now, retention_days) {
                Ok(deleted) if deleted > 0 => info!(deleted, "Deleted old expired quotes"),
                Err(e) => error!(error = %e, "Failed to clean up expired quotes"),
                _ => {}
            }
        }
    })
}
