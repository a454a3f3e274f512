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

use serde::{Deserialize, Serialize};

/// Solar input for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProfile {
    /// Lookup key, e.g. "buenos-aires"
    pub key: String,
    pub name: String,
    /// Equivalent full-sun hours per day
    pub sun_hours_daily: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Power temperature coefficient in %/°C
    pub temperature_coefficient: f64,
    /// Fraction of nameplate energy lost to wiring, soiling, inverter, etc.
    pub system_losses: f64,
}

impl LocationProfile {
    pub fn system_efficiency(&self) -> f64 {
        1.0 - self.system_losses
    }
}

/// Generation factors published for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSunData {
    pub location: LocationProfile,
    /// kWh per installed kWp per 30-day month, before losses
    pub monthly_generation_factor: f64,
    /// kWh per installed kWp per year, before losses
    pub annual_generation_factor: f64,
}
