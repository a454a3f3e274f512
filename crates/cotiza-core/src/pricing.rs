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

//! Exchange-rate cache policy and USD reference prices.
//!
//! Fetching lives in the server; this module only decides when a refresh is due and what the
//! cached rate implies for construction prices.

use chrono::{DateTime, Duration, Utc};
use cotiza_types::{ConstructionPrices, ExchangeRate, UpdaterStatus};
use serde::{Deserialize, Serialize};

pub const FALLBACK_SOURCE: &str = "estimado";

/// USD/m² reference prices: (materials, labor, finishes)
const STEEL_FRAME_USD: (f64, f64, f64) = (45.0, 35.0, 25.0);
const INDUSTRIAL_USD: (f64, f64, f64) = (55.0, 40.0, 30.0);
const CONTAINER_USD: (f64, f64, f64) = (35.0, 25.0, 20.0);

fn total((materials, labor, finishes): (f64, f64, f64)) -> f64 {
    materials + labor + finishes
}

/// Per-m² construction prices in ARS for a given rate
pub fn construction_prices(rate: &ExchangeRate) -> ConstructionPrices {
    let ars = |usd: f64| usd * rate.usd_ars;
    let (materials, labor, finishes) = STEEL_FRAME_USD;
    ConstructionPrices {
        steel_frame_m2: ars(total(STEEL_FRAME_USD)),
        industrial_m2: ars(total(INDUSTRIAL_USD)),
        container_m2: ars(total(CONTAINER_USD)),
        materials_m2: ars(materials),
        labor_m2: ars(labor),
        finishes_m2: ars(finishes),
    }
}

/// Configured last-resort rate. Non-positive values fall back to 1:1 so a rate always exists.
pub fn fallback_rate(usd_ars: f64, at: DateTime<Utc>) -> ExchangeRate {
    ExchangeRate::from_usd_ars(usd_ars, FALLBACK_SOURCE, at).unwrap_or(ExchangeRate {
        usd_ars: 1.0,
        ars_usd: 1.0,
        source: FALLBACK_SOURCE.to_owned(),
        fetched_at: at,
    })
}

/// On-disk form of the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrices {
    pub rate: ExchangeRate,
    pub prices: ConstructionPrices,
    pub last_update: DateTime<Utc>,
}

/// Last known rate plus the refresh schedule
#[derive(Debug, Clone)]
pub struct PriceCache {
    rate: Option<ExchangeRate>,
    last_update: Option<DateTime<Utc>>,
    interval: Duration,
    running: bool,
}

impl PriceCache {
    pub fn new(interval: Duration) -> Self {
        Self {
            rate: None,
            last_update: None,
            interval,
            running: false,
        }
    }

    /// Restore from a persisted snapshot
    #[must_use]
    pub fn with_cached(mut self, cached: CachedPrices) -> Self {
        self.rate = Some(cached.rate);
        self.last_update = Some(cached.last_update);
        self
    }

    pub fn rate(&self) -> Option<&ExchangeRate> {
        self.rate.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// True when nothing is cached or the interval has elapsed
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.last_update
            .is_none_or(|last| now.signed_duration_since(last) >= self.interval)
    }

    /// Due time of the next refresh; `now` if one is already due
    pub fn next_update(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_update {
            Some(last) if !self.is_stale(now) => last + self.interval,
            _ => now,
        }
    }

    pub fn record(&mut self, rate: ExchangeRate, at: DateTime<Utc>) {
        self.rate = Some(rate);
        self.last_update = Some(at);
    }

    /// Persistable snapshot, if a rate has been recorded
    pub fn cached(&self) -> Option<CachedPrices> {
        let rate = self.rate.clone()?;
        let last_update = self.last_update?;
        Some(CachedPrices {
            prices: construction_prices(&rate),
            rate,
            last_update,
        })
    }

    #[expect(clippy::cast_precision_loss, reason = "interval seconds fit in f64")]
    pub fn status(&self, now: DateTime<Utc>) -> UpdaterStatus {
        UpdaterStatus {
            running: self.running,
            last_update: self.last_update,
            next_update: self.running.then(|| self.next_update(now)),
            update_interval_hours: self.interval.num_seconds() as f64 / 3600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_cache_staleness() {
        let mut cache = PriceCache::new(Duration::hours(6));
        assert!(cache.is_stale(at(0)));
        assert_eq!(cache.next_update(at(0)), at(0));

        let rate = ExchangeRate::from_usd_ars(1_050.0, "BCRA", at(1)).unwrap();
        cache.record(rate, at(1));
        assert!(!cache.is_stale(at(6)));
        assert_eq!(cache.next_update(at(6)), at(7));
        assert!(cache.is_stale(at(7)));
        assert_eq!(cache.next_update(at(8)), at(8));
    }

    #[test]
    fn test_status_reports_schedule() {
        let mut cache = PriceCache::new(Duration::hours(6));
        let status = cache.status(at(0));
        assert!(!status.running);
        assert!(status.next_update.is_none());
        assert!((status.update_interval_hours - 6.0).abs() < f64::EPSILON);

        cache.set_running(true);
        cache.record(ExchangeRate::from_usd_ars(1_000.0, "BCRA", at(2)).unwrap(), at(2));
        let status = cache.status(at(3));
        assert_eq!(status.last_update, Some(at(2)));
        assert_eq!(status.next_update, Some(at(8)));
    }

    #[test]
    fn test_construction_prices_convert_with_usd_ars() {
        let rate = ExchangeRate::from_usd_ars(1_000.0, "BCRA", at(0)).unwrap();
        let prices = construction_prices(&rate);
        assert!((prices.steel_frame_m2 - 105_000.0).abs() < 1e-6);
        assert!((prices.industrial_m2 - 125_000.0).abs() < 1e-6);
        assert!((prices.container_m2 - 80_000.0).abs() < 1e-6);
        assert!((prices.labor_m2 - 35_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_fallback_rate() {
        let rate = fallback_rate(900.0, at(0));
        assert_eq!(rate.source, "estimado");
        assert!((rate.usd_ars - 900.0).abs() < f64::EPSILON);

        let rate = fallback_rate(-1.0, at(0));
        assert!((rate.usd_ars - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cached_snapshot_restores() {
        let mut cache = PriceCache::new(Duration::hours(6));
        assert!(cache.cached().is_none());
        cache.record(ExchangeRate::from_usd_ars(1_200.0, "dolar-blue", at(4)).unwrap(), at(4));
        let snapshot = cache.cached().unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: CachedPrices = serde_json::from_str(&json).unwrap();
        let cache = PriceCache::new(Duration::hours(6)).with_cached(restored);
        assert_eq!(cache.rate().unwrap().source, "dolar-blue");
        assert!(!cache.is_stale(at(5)));
    }
}
