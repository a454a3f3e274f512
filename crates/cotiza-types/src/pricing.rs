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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ARS/USD quote with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// ARS per one USD
    pub usd_ars: f64,
    /// USD per one ARS
    pub ars_usd: f64,
    /// "BCRA", "dolar-blue" or "estimado"
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Returns `None` unless `usd_ars` is a positive finite number
    pub fn from_usd_ars(
        usd_ars: f64,
        source: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Option<Self> {
        (usd_ars.is_finite() && usd_ars > 0.0).then(|| Self {
            usd_ars,
            ars_usd: 1.0 / usd_ars,
            source: source.into(),
            fetched_at,
        })
    }
}

/// Per-m² construction reference prices in ARS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPrices {
    pub steel_frame_m2: f64,
    pub industrial_m2: f64,
    pub container_m2: f64,
    pub materials_m2: f64,
    pub labor_m2: f64,
    pub finishes_m2: f64,
}

/// Price refresher state as reported over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdaterStatus {
    pub running: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
    pub update_interval_hours: f64,
}
