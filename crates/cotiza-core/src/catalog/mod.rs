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

//! Materials catalog: the lookup seam the solar calculator reads hardware through.

mod defaults;
pub mod ingest;
mod memory;

use chrono::{DateTime, Utc};
use cotiza_types::{
    Battery, BatteryChemistry, Cable, HardwareCategory, InstallationType, Inverter, InverterType,
    MountingSystem, Panel, PanelType, ProtectionDevice, ProtectionKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::default_records;
pub use ingest::{IngestError, MaterialRow};
pub use memory::{InMemoryCatalog, SharedCatalog};

/// Inclusive capacity bounds; an unset side is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl CapacityRange {
    pub const ANY: Self = Self {
        min: None,
        max: None,
    };

    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Read access to active hardware records.
///
/// Every accessor returns only active records, in catalog order. Selection policies rely on
/// that order for tie-breaks.
pub trait MaterialsCatalog {
    /// Panels filtered by type and by `power_watts`
    fn get_panels(&self, panel_type: Option<PanelType>, power_w: CapacityRange) -> Vec<&Panel>;

    /// Inverters filtered by type and by `power_kw`
    fn get_inverters(
        &self,
        inverter_type: Option<InverterType>,
        power_kw: CapacityRange,
    ) -> Vec<&Inverter>;

    /// Batteries filtered by chemistry and by `capacity_kwh`
    fn get_batteries(
        &self,
        chemistry: Option<BatteryChemistry>,
        capacity_kwh: CapacityRange,
    ) -> Vec<&Battery>;

    fn get_mounting(&self, installation_type: Option<InstallationType>) -> Vec<&MountingSystem>;

    /// Cables filtered by conductor section in mm²
    fn get_cables(&self, section_mm2: CapacityRange) -> Vec<&Cable>;

    fn get_protection(&self, kind: Option<ProtectionKind>) -> Vec<&ProtectionDevice>;
}

/// Active record counts per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub panels: usize,
    pub inverters: usize,
    pub batteries: usize,
    pub mounting: usize,
    pub cables: usize,
    pub protection: usize,
    pub total: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{} record '{id}' not found", .category.to_config_value())]
    NotFound {
        category: HardwareCategory,
        id: String,
    },

    #[error("invalid price {0}: must be a non-negative number")]
    InvalidPrice(f64),

    #[error("catalog ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("catalog CSV error: {0}")]
    Csv(#[from] csv::Error),
}
