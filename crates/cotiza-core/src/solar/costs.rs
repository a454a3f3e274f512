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

use cotiza_types::{
    Cable, CableSelection, MountingSelection, MountingSystem, ProtectionDevice,
    ProtectionSelection, WiringEstimate,
};

use super::params::NOMINAL_GRID_VOLTAGE;

pub fn mounting_selection(system: &MountingSystem, system_power_kw: f64) -> MountingSelection {
    MountingSelection {
        system: system.clone(),
        billed_power_kw: system_power_kw,
        total_cost: system.price_per_kw * system_power_kw,
    }
}

/// Run length from the site footprint, current from array power over grid voltage
pub fn wiring_estimate(
    available_area_m2: f64,
    panel_count: u32,
    panel_watts: u32,
    inverter_count: u32,
) -> WiringEstimate {
    WiringEstimate {
        estimated_length_m: available_area_m2.sqrt() * 2.0,
        max_current_a: f64::from(panel_count) * f64::from(panel_watts)
            / (f64::from(inverter_count) * NOMINAL_GRID_VOLTAGE),
    }
}

pub fn cable_selection(cable: &Cable, wiring: &WiringEstimate) -> CableSelection {
    CableSelection {
        cable: cable.clone(),
        length_m: wiring.estimated_length_m,
        total_cost: cable.price_per_meter * wiring.estimated_length_m,
    }
}

pub fn protection_selection(devices: &[&ProtectionDevice]) -> ProtectionSelection {
    ProtectionSelection {
        devices: devices.iter().map(|&d| d.clone()).collect(),
        total_cost: devices.iter().map(|d| d.price_ars).sum(),
    }
}

/// Whole crew-days, at least one
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "day counts are small positive integers"
)]
pub fn installation_days(system_power_kw: f64, kw_per_day: f64) -> u32 {
    let days = (system_power_kw / kw_per_day).floor();
    if days.is_finite() && days >= 1.0 {
        days.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Weakest-link warranty: the system is covered no longer than its shortest major component
pub fn system_warranty(panel_years: u32, inverter_years: u32, mounting_years: u32) -> u32 {
    panel_years.min(inverter_years).min(mounting_years)
}
