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

//! Quick preview for the front end. Works from fixed per-kW and per-panel assumptions and never
//! reads the materials catalog.

use cotiza_types::{InstallationType, LocationProfile, RoughEstimate};

use super::energy::generation;
use super::params::EstimateParams;
use super::sizing::{ceil_count, ceil_to_tenth, daily_consumption_kwh};
use crate::errors::{QuoteError, Result};

pub fn rough_estimate(
    monthly_consumption_kwh: f64,
    location: &LocationProfile,
    installation_type: InstallationType,
    params: &EstimateParams,
) -> Result<RoughEstimate> {
    if !monthly_consumption_kwh.is_finite() || monthly_consumption_kwh <= 0.0 {
        return Err(QuoteError::invalid(
            "monthly consumption must be greater than 0 kWh",
        ));
    }
    if params.reference_panel_watts == 0 {
        return Err(QuoteError::invalid("reference panel wattage must be positive"));
    }

    // No safety margin here, unlike the full sizing
    let daily = daily_consumption_kwh(monthly_consumption_kwh);
    let estimated_power_kwp =
        ceil_to_tenth(daily / (location.sun_hours_daily * location.system_efficiency()));
    let estimated_panels =
        ceil_count(estimated_power_kwp * 1000.0 / f64::from(params.reference_panel_watts));
    let estimated_area_m2 = f64::from(estimated_panels) * params.panel_area_m2;
    let estimated_cost = estimated_power_kwp * params.cost_per_kw;
    let annual_savings = monthly_consumption_kwh * params.reference_tariff * 12.0;

    if !annual_savings.is_finite() || annual_savings <= 0.0 {
        return Err(QuoteError::undefined(format!(
            "reference tariff {} ARS/kWh yields no savings",
            params.reference_tariff
        )));
    }

    let energy = generation(estimated_power_kwp, location);

    Ok(RoughEstimate {
        location: location.key.clone(),
        installation_type,
        monthly_consumption_kwh,
        estimated_power_kwp,
        estimated_panels,
        estimated_area_m2,
        estimated_cost,
        annual_savings,
        payback_years: estimated_cost / annual_savings,
        daily_generation_kwh: energy.daily_kwh,
        monthly_generation_kwh: energy.monthly_kwh,
        yearly_generation_kwh: energy.annual_kwh,
        suitable_for_area: estimated_area_m2 <= params.reference_area_m2,
    })
}
