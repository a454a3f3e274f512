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

//! Calculator output types. Values are kept at full precision; rounding is a display concern.

use serde::{Deserialize, Serialize};

use crate::enums::InstallationType;
use crate::hardware::{Battery, Cable, Inverter, MountingSystem, Panel, ProtectionDevice};
use crate::location::LocationProfile;

/// A catalog pick with its quantity and extended cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection<T> {
    pub item: T,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_cost: f64,
}

impl<T> Selection<T> {
    pub fn new(item: T, quantity: u32, unit_price: f64) -> Self {
        Self {
            item,
            quantity,
            unit_price,
            total_cost: unit_price * f64::from(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountingSelection {
    pub system: MountingSystem,
    /// Array power the per-kW price was applied to
    pub billed_power_kw: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSelection {
    pub cable: Cable,
    pub length_m: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionSelection {
    pub devices: Vec<ProtectionDevice>,
    pub total_cost: f64,
}

/// Advisory wiring figures; not used to size cables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WiringEstimate {
    pub estimated_length_m: f64,
    pub max_current_a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyGeneration {
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub annual_kwh: f64,
    /// 1 - system losses
    pub system_efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub panels: f64,
    pub inverters: f64,
    pub batteries: f64,
    pub mounting: f64,
    pub cables: f64,
    pub protection: f64,
    pub installation: f64,
    pub permits: f64,
    pub total_investment: f64,
}

impl CostBreakdown {
    #[expect(clippy::too_many_arguments, reason = "one argument per cost category")]
    pub fn new(
        panels: f64,
        inverters: f64,
        batteries: f64,
        mounting: f64,
        cables: f64,
        protection: f64,
        installation: f64,
        permits: f64,
    ) -> Self {
        let mut breakdown = Self {
            panels,
            inverters,
            batteries,
            mounting,
            cables,
            protection,
            installation,
            permits,
            total_investment: 0.0,
        };
        breakdown.total_investment = breakdown.category_sum();
        breakdown
    }

    /// Sum of the category costs in declaration order
    pub fn category_sum(&self) -> f64 {
        self.panels
            + self.inverters
            + self.batteries
            + self.mounting
            + self.cables
            + self.protection
            + self.installation
            + self.permits
    }

    pub fn equipment(&self) -> f64 {
        self.panels + self.inverters + self.batteries + self.mounting + self.cables + self.protection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Economics {
    /// ARS per kWh for the request's tariff class
    pub tariff_rate: f64,
    /// Share of billed consumption offset by generation
    pub self_consumption_ratio: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub roi_percentage: f64,
    pub annual_maintenance: f64,
}

/// Fully specified system design with costs and economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDesign {
    pub location: LocationProfile,
    pub required_power_kwp: f64,
    /// Realized array power, panel_count * panel watts
    pub system_power_kw: f64,
    pub panels: Selection<Panel>,
    pub inverters: Selection<Inverter>,
    pub batteries: Option<Selection<Battery>>,
    /// Battery capacity the autonomy target asked for, when backup was requested
    pub required_battery_capacity_kwh: Option<f64>,
    pub mounting: MountingSelection,
    pub cables: Option<CableSelection>,
    pub protection: ProtectionSelection,
    pub wiring: WiringEstimate,
    pub generation: EnergyGeneration,
    pub costs: CostBreakdown,
    pub economics: Economics,
    pub warranty_years: u32,
    pub installation_days: u32,
}

impl SystemDesign {
    pub fn panel_count(&self) -> u32 {
        self.panels.quantity
    }

    pub fn inverter_count(&self) -> u32 {
        self.inverters.quantity
    }

    pub fn battery_count(&self) -> u32 {
        self.batteries.as_ref().map_or(0, |b| b.quantity)
    }
}

/// Catalog-independent preview of a system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoughEstimate {
    pub location: String,
    pub installation_type: InstallationType,
    pub monthly_consumption_kwh: f64,
    pub estimated_power_kwp: f64,
    pub estimated_panels: u32,
    pub estimated_area_m2: f64,
    pub estimated_cost: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub daily_generation_kwh: f64,
    pub monthly_generation_kwh: f64,
    pub yearly_generation_kwh: f64,
    pub suitable_for_area: bool,
}
