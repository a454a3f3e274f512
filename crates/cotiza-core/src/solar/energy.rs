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

use cotiza_types::{EnergyGeneration, LocationProfile};

use super::params::{DAYS_PER_MONTH, DAYS_PER_YEAR};

/// Flat-loss generation model; no hardware-specific derating
pub fn generation(power_kwp: f64, location: &LocationProfile) -> EnergyGeneration {
    let system_efficiency = location.system_efficiency();
    let daily_kwh = power_kwp * location.sun_hours_daily * system_efficiency;
    EnergyGeneration {
        daily_kwh,
        monthly_kwh: daily_kwh * DAYS_PER_MONTH,
        annual_kwh: daily_kwh * DAYS_PER_YEAR,
        system_efficiency,
    }
}
