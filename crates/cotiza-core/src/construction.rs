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

//! Per-m² cost model for steel frame, industrial and container buildings

use cotiza_types::{
    ConstructionCosts, ConstructionQuote, ConstructionRequest, ConstructionType, FinishLevel,
    MaterialPrice, UsageType,
};
use uuid::Uuid;

use crate::errors::{QuoteError, Result};

pub const MAX_AREA_M2: f64 = 10_000.0;
pub const MAX_FLOORS: u32 = 10;
pub const VAT_RATE: f64 = 0.21;
pub const QUOTE_VALIDITY_DAYS: u32 = 30;

/// Base ARS/m² per cost line
const STRUCTURE_M2: f64 = 2_500.0;
const ROOFING_M2: f64 = 1_800.0;
const INSULATION_M2: f64 = 600.0;
const INTERIOR_M2: f64 = 1_200.0;
const FINISHES_M2: f64 = 800.0;
const INSTALLATIONS_M2: f64 = 1_500.0;
/// Fixed per project
const TRANSPORT: f64 = 300.0;

const DAYS_PER_M2: f64 = 0.5;

const REGIONAL_MULTIPLIERS: &[(&str, f64)] = &[
    ("buenos_aires", 1.0),
    ("caba", 1.2),
    ("cordoba", 0.9),
    ("santa_fe", 0.95),
    ("mendoza", 0.85),
    ("tucuman", 0.8),
    ("salta", 0.75),
    ("jujuy", 0.7),
    ("chaco", 0.8),
    ("formosa", 0.75),
    ("misiones", 0.85),
    ("corrientes", 0.8),
    ("entre_rios", 0.9),
    ("la_pampa", 0.85),
    ("rio_negro", 0.9),
    ("neuquen", 0.95),
    ("chubut", 0.9),
    ("santa_cruz", 1.1),
    ("tierra_del_fuego", 1.3),
];

const METROPOLITAN: &[&str] = &["buenos_aires", "caba"];

/// (name, ARS, unit, category)
const BASE_MATERIALS: &[(&str, f64, &str, &str)] = &[
    ("acero_estructural", 1_500.0, "kg", "estructura"),
    ("perfil_steel_frame", 800.0, "m2", "estructura"),
    ("hierro_redondo", 1_200.0, "kg", "estructura"),
    ("chapa_acanalada", 450.0, "m2", "cubierta"),
    ("lana_mineral", 120.0, "m2", "aislamiento"),
    ("placa_yeso", 180.0, "m2", "interior"),
    ("pintura_interior", 85.0, "m2", "terminacion"),
    ("pintura_exterior", 120.0, "m2", "terminacion"),
    ("ceramica", 350.0, "m2", "terminacion"),
    ("porcelanato", 650.0, "m2", "terminacion"),
];

/// Multipliers a construction type applies to individual cost lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexityFactors {
    pub structure: f64,
    pub insulation: f64,
    pub finishes: f64,
    pub installations: f64,
}

impl ComplexityFactors {
    pub fn for_type(construction_type: ConstructionType) -> Self {
        let (structure, insulation, finishes, installations) = match construction_type {
            ConstructionType::SteelFrame => (1.0, 1.2, 1.1, 1.0),
            ConstructionType::Industrial => (1.3, 0.8, 0.7, 1.4),
            ConstructionType::Container => (0.8, 1.5, 1.3, 1.2),
            ConstructionType::Mixed => (1.1, 1.1, 1.0, 1.1),
        };
        Self {
            structure,
            insulation,
            finishes,
            installations,
        }
    }
}

pub fn usage_factor(usage: UsageType) -> f64 {
    match usage {
        UsageType::Residential => 1.0,
        UsageType::Industrial => 0.9,
        UsageType::Commercial => 1.1,
    }
}

pub fn finish_factor(finish: FinishLevel) -> f64 {
    match finish {
        FinishLevel::Basic => 0.7,
        FinishLevel::Standard => 1.0,
        FinishLevel::Premium => 1.4,
    }
}

fn province_key(province: &str) -> String {
    province.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Price multiplier for a province; 1.0 when the province is not listed
pub fn regional_multiplier(province: &str) -> f64 {
    let key = province_key(province);
    REGIONAL_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(1.0, |&(_, multiplier)| multiplier)
}

/// Reference material prices
pub fn base_materials() -> Vec<MaterialPrice> {
    BASE_MATERIALS
        .iter()
        .map(|&(name, price_ars, unit, category)| MaterialPrice {
            name: name.to_owned(),
            price_ars,
            unit: unit.to_owned(),
            category: category.to_owned(),
        })
        .collect()
}

fn material(name: &str) -> Option<MaterialPrice> {
    base_materials().into_iter().find(|m| m.name == name)
}

pub fn validate(request: &ConstructionRequest) -> Result<()> {
    if !request.area_m2.is_finite() || request.area_m2 <= 0.0 || request.area_m2 > MAX_AREA_M2 {
        return Err(QuoteError::invalid(format!(
            "area must be greater than 0 and at most {MAX_AREA_M2} m², got {}",
            request.area_m2
        )));
    }
    if !(1..=MAX_FLOORS).contains(&request.floors) {
        return Err(QuoteError::invalid(format!(
            "floors must be between 1 and {MAX_FLOORS}, got {}",
            request.floors
        )));
    }
    Ok(())
}

/// Factored cost lines. Taxes are charged on the factored subtotal so the total always equals
/// the sum of its parts.
pub fn costs(request: &ConstructionRequest, regional_multiplier: f64) -> ConstructionCosts {
    let area = request.area_m2 * regional_multiplier;
    let factors = ComplexityFactors::for_type(request.construction_type);

    let structure = STRUCTURE_M2 * area * factors.structure;
    let roofing = ROOFING_M2 * area;
    let insulation = INSULATION_M2 * area * factors.insulation;
    let interior = INTERIOR_M2 * area;
    let finishes = FINISHES_M2 * area * factors.finishes * finish_factor(request.finish);
    let installations =
        INSTALLATIONS_M2 * area * factors.installations * usage_factor(request.usage);

    let materials = structure + roofing + insulation + interior;
    let labor = finishes + installations;
    let transport = TRANSPORT * regional_multiplier;
    let subtotal = materials + labor + transport;
    let taxes = subtotal * VAT_RATE;

    ConstructionCosts {
        materials,
        labor,
        transport,
        taxes,
        total: subtotal + taxes,
    }
}

/// Whole days of work
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "area is bounded by validation"
)]
pub fn duration_days(request: &ConstructionRequest) -> u32 {
    let mut per_m2 = DAYS_PER_M2;
    if request.floors > 1 {
        per_m2 *= 1.3;
    }
    if request.has_terrace {
        per_m2 *= 1.1;
    }
    if request.has_basement {
        per_m2 *= 1.2;
    }
    (request.area_m2 * per_m2).max(0.0) as u32
}

pub fn format_duration(days: u32) -> String {
    match days {
        0..30 => format!("{days} días"),
        30..365 => format!("{} meses", days / 30),
        _ => format!("{} años", days / 365),
    }
}

pub fn materials_used(request: &ConstructionRequest) -> Vec<MaterialPrice> {
    let structural: &[&str] = match request.construction_type {
        ConstructionType::SteelFrame => &["perfil_steel_frame", "lana_mineral", "placa_yeso"],
        ConstructionType::Industrial => &["acero_estructural", "hierro_redondo", "chapa_acanalada"],
        ConstructionType::Container => &["acero_estructural", "lana_mineral", "placa_yeso"],
        ConstructionType::Mixed => &[],
    };
    let finishing: &[&str] = match request.finish {
        FinishLevel::Basic => &["pintura_interior"],
        FinishLevel::Standard => &["pintura_interior", "pintura_exterior"],
        FinishLevel::Premium => &["pintura_interior", "pintura_exterior", "porcelanato"],
    };
    structural
        .iter()
        .chain(finishing)
        .filter_map(|name| material(name))
        .collect()
}

pub fn observations(request: &ConstructionRequest) -> Vec<String> {
    let mut notes: Vec<&str> = match request.construction_type {
        ConstructionType::SteelFrame => vec![
            "Construcción en seco con perfiles de acero galvanizado",
            "Aislamiento térmico y acústico incluido",
        ],
        ConstructionType::Industrial => vec![
            "Estructura industrial con hierros estructurales",
            "Cubierta con chapa acanalada galvanizada",
        ],
        ConstructionType::Container => vec![
            "Conversión de contenedor marítimo estándar",
            "Aislamiento térmico reforzado",
        ],
        ConstructionType::Mixed => Vec::new(),
    };
    if request.finish == FinishLevel::Premium {
        notes.push("Terminaciones premium con materiales de alta calidad");
    }
    if METROPOLITAN.contains(&province_key(&request.province).as_str()) {
        notes.push("Precios ajustados para región metropolitana");
    }
    notes.extend([
        "Cotización válida por 30 días",
        "Incluye materiales, mano de obra e instalaciones",
        "No incluye cimientos ni conexiones de servicios",
    ]);
    notes.into_iter().map(str::to_owned).collect()
}

/// Full construction quote in ARS
pub fn quote(request: &ConstructionRequest) -> Result<ConstructionQuote> {
    validate(request)?;
    let multiplier = regional_multiplier(&request.province);

    Ok(ConstructionQuote {
        quote_id: Uuid::new_v4(),
        customer: request.name.clone(),
        currency: "ARS".to_owned(),
        regional_multiplier: multiplier,
        costs: costs(request, multiplier),
        materials: materials_used(request),
        estimated_duration: format_duration(duration_days(request)),
        observations: observations(request),
        validity_days: QUOTE_VALIDITY_DAYS,
    })
}
