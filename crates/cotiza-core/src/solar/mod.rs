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

//! Photovoltaic system sizing.
//!
//! [`SolarCalculator`] turns a [`QuoteRequest`] into a priced [`SystemDesign`] using hardware from
//! a [`MaterialsCatalog`]. The calculator is pure: it holds read-only tables, performs no I/O and
//! gives identical output for identical input.

pub mod costs;
pub mod economics;
pub mod energy;
pub mod estimate;
pub mod params;
pub mod selection;
pub mod sizing;

use cotiza_types::{
    BatteryChemistry, CostBreakdown, HardwareCategory, InstallationType, LocationSunData,
    QuoteRequest, RoughEstimate, Selection, SystemDesign,
};
use tracing::debug;

use crate::catalog::{CapacityRange, MaterialsCatalog};
use crate::errors::{QuoteError, Result};
use crate::location::LocationTable;
use crate::tariff::TariffTable;

pub use params::{EconomicParams, EstimateParams};

#[derive(Debug, Clone, Default)]
pub struct SolarCalculator {
    locations: LocationTable,
    tariffs: TariffTable,
    params: EconomicParams,
    estimate_params: EstimateParams,
}

impl SolarCalculator {
    pub fn new(
        locations: LocationTable,
        tariffs: TariffTable,
        params: EconomicParams,
        estimate_params: EstimateParams,
    ) -> Self {
        Self {
            locations,
            tariffs,
            params,
            estimate_params,
        }
    }

    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn params(&self) -> &EconomicParams {
        &self.params
    }

    /// Size, select and price a complete installation
    pub fn size_system<C: MaterialsCatalog + ?Sized>(
        &self,
        request: &QuoteRequest,
        catalog: &C,
    ) -> Result<SystemDesign> {
        validate_request(request)?;

        let location = self.locations.resolve(&request.location);
        let required_power_kwp =
            sizing::required_power_kwp(request.monthly_consumption_kwh, location);

        // Panels, monocrystalline unless the customer asked otherwise
        let panel_type = request.panel_type_preference.unwrap_or_default();
        let panel_candidates = selection::prefer(
            catalog.get_panels(None, CapacityRange::ANY),
            |p| p.panel_type == panel_type,
        );
        let panel = selection::pick_panel(&panel_candidates)
            .ok_or(QuoteError::CatalogExhausted(HardwareCategory::Panels))?;
        let panel_count =
            sizing::ceil_count(required_power_kwp * 1000.0 / f64::from(panel.power_watts));
        let system_power_kw = f64::from(panel_count) * f64::from(panel.power_watts) / 1000.0;

        // Inverters, string unless the customer asked otherwise
        let inverter_type = request.inverter_type_preference.unwrap_or_default();
        let inverter_candidates = selection::prefer(
            catalog.get_inverters(None, CapacityRange::ANY),
            |i| i.inverter_type == inverter_type,
        );
        let inverter = selection::pick_inverter(&inverter_candidates, system_power_kw)
            .ok_or(QuoteError::CatalogExhausted(HardwareCategory::Inverters))?;
        let inverter_count = sizing::ceil_count(system_power_kw / inverter.power_kw);

        // Batteries
        let (batteries, required_battery_capacity_kwh) = if request.battery_backup {
            let autonomy = request
                .battery_autonomy_hours
                .unwrap_or(self.params.default_battery_autonomy_hours);
            let required_kwh =
                sizing::required_battery_capacity_kwh(request.monthly_consumption_kwh, autonomy);
            let candidates = selection::prefer(
                catalog.get_batteries(None, CapacityRange::ANY),
                |b| b.chemistry == BatteryChemistry::Lithium,
            );
            let battery = selection::pick_battery(&candidates, required_kwh)
                .ok_or(QuoteError::CatalogExhausted(HardwareCategory::Batteries))?;
            let count = sizing::ceil_count(required_kwh / battery.capacity_kwh);
            (
                Some(Selection::new(battery.clone(), count, battery.price_ars)),
                Some(required_kwh),
            )
        } else {
            (None, None)
        };

        // Mounting
        let mounting_system =
            selection::pick_mounting(&catalog.get_mounting(None), request.installation_type)
                .ok_or(QuoteError::CatalogExhausted(HardwareCategory::Mounting))?;
        let mounting = costs::mounting_selection(mounting_system, system_power_kw);

        // Cables and protection are optional
        let wiring = costs::wiring_estimate(
            request.available_area_m2,
            panel_count,
            panel.power_watts,
            inverter_count,
        );
        let cables = selection::pick_cable(&catalog.get_cables(CapacityRange::ANY))
            .map(|cable| costs::cable_selection(cable, &wiring));
        let protection =
            costs::protection_selection(&selection::pick_protection(&catalog.get_protection(None)));

        let panels = Selection::new(panel.clone(), panel_count, panel.price_ars);
        let inverters = Selection::new(inverter.clone(), inverter_count, inverter.price_ars);

        let breakdown = CostBreakdown::new(
            panels.total_cost,
            inverters.total_cost,
            batteries.as_ref().map_or(0.0, |b| b.total_cost),
            mounting.total_cost,
            cables.as_ref().map_or(0.0, |c| c.total_cost),
            protection.total_cost,
            self.params.installation_cost_per_kw * system_power_kw,
            self.params.permits_cost_per_kw * system_power_kw,
        );

        let tariff_rate = self.tariffs.rate(request.tariff_type);
        let economics = economics::economics(
            request.monthly_consumption_kwh,
            tariff_rate,
            breakdown.total_investment,
            &self.params,
        )?;

        debug!(
            location = %location.key,
            required_power_kwp,
            system_power_kw,
            panel = %panel.identity.label(),
            panel_count,
            inverter = %inverter.identity.label(),
            inverter_count,
            total_investment = breakdown.total_investment,
            "System sized"
        );

        Ok(SystemDesign {
            location: location.clone(),
            required_power_kwp,
            system_power_kw,
            generation: energy::generation(required_power_kwp, location),
            warranty_years: costs::system_warranty(
                panel.warranty_years,
                inverter.warranty_years,
                mounting_system.warranty_years,
            ),
            installation_days: costs::installation_days(
                system_power_kw,
                self.params.installation_kw_per_day,
            ),
            panels,
            inverters,
            batteries,
            required_battery_capacity_kwh,
            mounting,
            cables,
            protection,
            wiring,
            costs: breakdown,
            economics,
        })
    }

    /// Catalog-free preview
    pub fn estimate(
        &self,
        monthly_consumption_kwh: f64,
        location: &str,
        installation_type: InstallationType,
    ) -> Result<RoughEstimate> {
        estimate::rough_estimate(
            monthly_consumption_kwh,
            self.locations.resolve(location),
            installation_type,
            &self.estimate_params,
        )
    }

    pub fn location_sun_data(&self, location: &str) -> LocationSunData {
        self.locations.sun_data(location)
    }
}

fn positive(value: f64, what: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QuoteError::invalid(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

/// Numeric checks that typed deserialization cannot express
pub fn validate_request(request: &QuoteRequest) -> Result<()> {
    positive(request.monthly_consumption_kwh, "monthly consumption (kWh)")?;
    positive(request.available_area_m2, "available area (m²)")?;
    if let Some(hours) = request.battery_autonomy_hours {
        positive(hours, "battery autonomy (hours)")?;
    }
    Ok(())
}

/// Decode and validate a JSON quote request. Unknown enum values and missing fields become
/// `InvalidRequest`.
pub fn parse_quote_request(value: serde_json::Value) -> Result<QuoteRequest> {
    let request: QuoteRequest =
        serde_json::from_value(value).map_err(|e| QuoteError::invalid(e.to_string()))?;
    validate_request(&request)?;
    Ok(request)
}
