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

//! Materials catalog records.
//!
//! One struct per hardware category, all fields mandatory. Prices are in ARS.

use serde::{Deserialize, Serialize};

use crate::enums::{
    BatteryChemistry, HardwareCategory, InstallationType, InverterType, PanelType, ProtectionKind,
};

/// Identity shared by every catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareIdentity {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub supplier: Option<String>,
    pub active: bool,
}

impl HardwareIdentity {
    pub fn new(id: impl Into<String>, brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            supplier: None,
            active: true,
        }
    }

    /// "Brand Model", as printed on quotes
    pub fn label(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub panel_type: PanelType,
    pub power_watts: u32,
    pub efficiency_percent: f64,
    pub price_ars: f64,
    pub warranty_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inverter {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub inverter_type: InverterType,
    pub power_kw: f64,
    pub efficiency_percent: f64,
    pub has_mppt: bool,
    pub price_ars: f64,
    pub warranty_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub chemistry: BatteryChemistry,
    pub capacity_kwh: f64,
    pub voltage_v: f64,
    pub cycles: u32,
    pub price_ars: f64,
    pub warranty_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountingSystem {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub installation_type: InstallationType,
    pub material: String,
    /// Priced per kW of realized array power
    pub price_per_kw: f64,
    pub warranty_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub section_mm2: f64,
    pub price_per_meter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionDevice {
    #[serde(flatten)]
    pub identity: HardwareIdentity,
    pub kind: ProtectionKind,
    pub current_rating_a: f64,
    pub voltage_rating_v: f64,
    pub price_ars: f64,
}

/// A catalog entry of any category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HardwareRecord {
    Panel(Panel),
    Inverter(Inverter),
    Battery(Battery),
    MountingSystem(MountingSystem),
    Cable(Cable),
    ProtectionDevice(ProtectionDevice),
}

impl HardwareRecord {
    pub fn category(&self) -> HardwareCategory {
        match self {
            Self::Panel(_) => HardwareCategory::Panels,
            Self::Inverter(_) => HardwareCategory::Inverters,
            Self::Battery(_) => HardwareCategory::Batteries,
            Self::MountingSystem(_) => HardwareCategory::Mounting,
            Self::Cable(_) => HardwareCategory::Cables,
            Self::ProtectionDevice(_) => HardwareCategory::Protection,
        }
    }

    pub fn identity(&self) -> &HardwareIdentity {
        match self {
            Self::Panel(p) => &p.identity,
            Self::Inverter(i) => &i.identity,
            Self::Battery(b) => &b.identity,
            Self::MountingSystem(m) => &m.identity,
            Self::Cable(c) => &c.identity,
            Self::ProtectionDevice(d) => &d.identity,
        }
    }

    /// The price field that category is billed by (unit, per kW or per meter)
    pub fn unit_price(&self) -> f64 {
        match self {
            Self::Panel(p) => p.price_ars,
            Self::Inverter(i) => i.price_ars,
            Self::Battery(b) => b.price_ars,
            Self::MountingSystem(m) => m.price_per_kw,
            Self::Cable(c) => c.price_per_meter,
            Self::ProtectionDevice(d) => d.price_ars,
        }
    }
}
