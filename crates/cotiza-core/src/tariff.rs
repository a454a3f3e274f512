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

use cotiza_types::TariffType;
use serde::{Deserialize, Serialize};

/// Electricity price per tariff class, ARS/kWh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    #[serde(default = "default_residential")]
    pub residential: f64,
    #[serde(default = "default_commercial")]
    pub commercial: f64,
    #[serde(default = "default_industrial")]
    pub industrial: f64,
}

fn default_residential() -> f64 {
    45.0
}

fn default_commercial() -> f64 {
    38.0
}

fn default_industrial() -> f64 {
    32.0
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            residential: default_residential(),
            commercial: default_commercial(),
            industrial: default_industrial(),
        }
    }
}

impl TariffTable {
    pub fn rate(&self, tariff: TariffType) -> f64 {
        match tariff {
            TariffType::Residential => self.residential,
            TariffType::Commercial => self.commercial,
            TariffType::Industrial => self.industrial,
        }
    }
}
