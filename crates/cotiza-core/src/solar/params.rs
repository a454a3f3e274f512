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

/// Oversizing applied to the consumption-derived array power
pub const SIZING_SAFETY_FACTOR: f64 = 1.2;

/// Days per month used by the consumption and generation model
pub const DAYS_PER_MONTH: f64 = 30.0;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Grid voltage assumed by the advisory current estimate
pub const NOMINAL_GRID_VOLTAGE: f64 = 220.0;

/// Cost and economics parameters of a full quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicParams {
    /// ARS per kW of realized array power
    #[serde(default = "default_installation_cost_per_kw")]
    pub installation_cost_per_kw: f64,
    /// ARS per kW of realized array power
    #[serde(default = "default_permits_cost_per_kw")]
    pub permits_cost_per_kw: f64,
    /// Fraction of total investment spent on maintenance each year
    #[serde(default = "default_maintenance_rate")]
    pub maintenance_rate: f64,
    /// Share of billed consumption offset by generation. 1.0 assumes every generated kWh
    /// replaces a purchased one (no export tariff, no time-of-use mismatch).
    #[serde(default = "default_self_consumption_ratio")]
    pub self_consumption_ratio: f64,
    /// Installed kW a crew completes per day
    #[serde(default = "default_installation_kw_per_day")]
    pub installation_kw_per_day: f64,
    #[serde(default = "default_battery_autonomy_hours")]
    pub default_battery_autonomy_hours: f64,
}

fn default_installation_cost_per_kw() -> f64 {
    50_000.0
}

fn default_permits_cost_per_kw() -> f64 {
    50_000.0
}

fn default_maintenance_rate() -> f64 {
    0.01
}

fn default_self_consumption_ratio() -> f64 {
    1.0
}

fn default_installation_kw_per_day() -> f64 {
    2.0
}

fn default_battery_autonomy_hours() -> f64 {
    8.0
}

impl Default for EconomicParams {
    fn default() -> Self {
        Self {
            installation_cost_per_kw: default_installation_cost_per_kw(),
            permits_cost_per_kw: default_permits_cost_per_kw(),
            maintenance_rate: default_maintenance_rate(),
            self_consumption_ratio: default_self_consumption_ratio(),
            installation_kw_per_day: default_installation_kw_per_day(),
            default_battery_autonomy_hours: default_battery_autonomy_hours(),
        }
    }
}

/// Fixed assumptions behind the catalog-free estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateParams {
    #[serde(default = "default_reference_panel_watts")]
    pub reference_panel_watts: u32,
    #[serde(default = "default_panel_area_m2")]
    pub panel_area_m2: f64,
    /// All-in ARS per kWp
    #[serde(default = "default_cost_per_kw")]
    pub cost_per_kw: f64,
    /// ARS/kWh used for the savings preview regardless of tariff class
    #[serde(default = "default_reference_tariff")]
    pub reference_tariff: f64,
    /// Roof area a typical site offers
    #[serde(default = "default_reference_area_m2")]
    pub reference_area_m2: f64,
}

fn default_reference_panel_watts() -> u32 {
    400
}

fn default_panel_area_m2() -> f64 {
    2.0
}

fn default_cost_per_kw() -> f64 {
    800_000.0
}

fn default_reference_tariff() -> f64 {
    45.0
}

fn default_reference_area_m2() -> f64 {
    100.0
}

impl Default for EstimateParams {
    fn default() -> Self {
        Self {
            reference_panel_watts: default_reference_panel_watts(),
            panel_area_m2: default_panel_area_m2(),
            cost_per_kw: default_cost_per_kw(),
            reference_tariff: default_reference_tariff(),
            reference_area_m2: default_reference_area_m2(),
        }
    }
}
