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

use cotiza_types::LocationProfile;

use super::params::{DAYS_PER_MONTH, SIZING_SAFETY_FACTOR};

/// Float noise tolerated before a value counts as past an integer boundary
const CEIL_TOLERANCE: f64 = 1e-9;

/// Ceiling that ignores representation error just above an integer
pub fn ceil_tolerant(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor <= CEIL_TOLERANCE {
        floor
    } else {
        value.ceil()
    }
}

/// Round up to the next 0.1
pub fn ceil_to_tenth(value: f64) -> f64 {
    ceil_tolerant(value * 10.0) / 10.0
}

/// Units needed to cover `value`; at least one
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "unit counts are small positive integers"
)]
pub fn ceil_count(value: f64) -> u32 {
    let units = ceil_tolerant(value);
    if units.is_finite() && units >= 1.0 {
        units.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

pub fn daily_consumption_kwh(monthly_consumption_kwh: f64) -> f64 {
    monthly_consumption_kwh / DAYS_PER_MONTH
}

/// Array power covering the daily consumption with the safety margin, in 0.1 kWp steps
pub fn required_power_kwp(monthly_consumption_kwh: f64, location: &LocationProfile) -> f64 {
    let daily = daily_consumption_kwh(monthly_consumption_kwh);
    ceil_to_tenth(
        (daily * SIZING_SAFETY_FACTOR) / (location.sun_hours_daily * location.system_efficiency()),
    )
}

pub fn required_battery_capacity_kwh(monthly_consumption_kwh: f64, autonomy_hours: f64) -> f64 {
    daily_consumption_kwh(monthly_consumption_kwh) * autonomy_hours / 24.0
}
