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
use uuid::Uuid;

use crate::enums::{ConstructionType, FinishLevel, UsageType};

/// Steel frame / industrial building quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub construction_type: ConstructionType,
    pub usage: UsageType,
    #[serde(default)]
    pub finish: FinishLevel,
    pub area_m2: f64,
    #[serde(default = "default_floors")]
    pub floors: u32,
    #[serde(default)]
    pub has_terrace: bool,
    #[serde(default)]
    pub has_basement: bool,
    pub province: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_floors() -> u32 {
    1
}

/// Reference material with its base price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub name: String,
    pub price_ars: f64,
    pub unit: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionCosts {
    pub materials: f64,
    pub labor: f64,
    pub transport: f64,
    pub taxes: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionQuote {
    pub quote_id: Uuid,
    pub customer: String,
    pub currency: String,
    pub regional_multiplier: f64,
    pub costs: ConstructionCosts,
    pub materials: Vec<MaterialPrice>,
    pub estimated_duration: String,
    pub observations: Vec<String>,
    pub validity_days: u32,
}
