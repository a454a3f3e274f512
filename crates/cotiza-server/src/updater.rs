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

//! Exchange-rate refresh loop around the core `PriceCache`, persisted as JSON

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use cotiza_core::pricing::{construction_prices, fallback_rate};
use cotiza_core::{CachedPrices, PriceCache};
use cotiza_types::{ExchangeRate, UpdaterStatus};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::rates::ExchangeRateClient;

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn current_rate(&self) -> ExchangeRate;
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn current_rate(&self) -> ExchangeRate {
        Self::current_rate(self).await
    }
}

pub struct PriceUpdater {
    cache: RwLock<PriceCache>,
    source: Arc<dyn RateSource>,
    cache_path: PathBuf,
    fallback_usd_ars: f64,
}

impl std::fmt::Debug for PriceUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceUpdater")
            .field("cache", &self.cache)
            .field("cache_path", &self.cache_path)
            .finish_non_exhaustive()
    }
}

fn load_cached(path: &Path) -> Option<CachedPrices> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read price cache");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(cached) => Some(cached),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable price cache");
            None
        }
    }
}

impl PriceUpdater {
    /// Restores the cache from `cache_path` when a readable one exists
    pub fn new(
        source: Arc<dyn RateSource>,
        cache_path: impl Into<PathBuf>,
        interval: Duration,
        fallback_usd_ars: f64,
    ) -> Self {
        let cache_path = cache_path.into();
        let interval = chrono::Duration::from_std(interval).unwrap_or(chrono::Duration::hours(6));
        let mut cache = PriceCache::new(interval);
        if let Some(cached) = load_cached(&cache_path) {
            info!(
                usd_ars = cached.rate.usd_ars,
                last_update = %cached.last_update,
                "Price cache restored"
            );
            cache = cache.with_cached(cached);
        }

        Self {
            cache: RwLock::new(cache),
            source,
            cache_path,
            fallback_usd_ars,
        }
    }

    /// Cached rate, or the configured estimate before the first refresh
    pub fn rate(&self) -> ExchangeRate {
        self.cache
            .read()
            .rate()
            .cloned()
            .unwrap_or_else(|| fallback_rate(self.fallback_usd_ars, Utc::now()))
    }

    /// Rate and converted construction prices
    pub fn current(&self) -> CachedPrices {
        if let Some(cached) = self.cache.read().cached() {
            return cached;
        }
        let rate = self.rate();
        CachedPrices {
            prices: construction_prices(&rate),
            last_update: rate.fetched_at,
            rate,
        }
    }

    pub fn status(&self) -> UpdaterStatus {
        self.cache.read().status(Utc::now())
    }

    /// Fetch a new rate unconditionally and persist it
    pub async fn refresh(&self) -> ExchangeRate {
        let rate = self.source.current_rate().await;
        self.cache.write().record(rate.clone(), Utc::now());
        info!(usd_ars = rate.usd_ars, source = %rate.source, "Exchange rate updated");

        if let Err(e) = self.save() {
            error!(error = %e, "Failed to persist price cache");
        }
        rate
    }

    pub async fn refresh_if_stale(&self) -> Option<ExchangeRate> {
        if self.cache.read().is_stale(Utc::now()) {
            Some(self.refresh().await)
        } else {
            debug!("Price cache is fresh, skipping refresh");
            None
        }
    }

    fn save(&self) -> Result<()> {
        let Some(cached) = self.cache.read().cached() else {
            return Ok(());
        };
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&self.cache_path, json)
            .with_context(|| format!("Failed to write {}", self.cache_path.display()))?;
        Ok(())
    }

    /// Refreshes whenever the cache goes stale, sleeping until the next due time
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.cache.write().set_running(true);
            info!(
                interval_hours = self.status().update_interval_hours,
                "Price updater started"
            );

            loop {
                self.refresh_if_stale().await;

                let now = Utc::now();
                let due = self.cache.read().next_update(now);
                let wait = (due - now).to_std().unwrap_or_default();
                tokio::time::sleep(wait.max(Duration::from_secs(1))).await;
            }
        })
    }
}
