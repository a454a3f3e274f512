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

//! Raw materials-table rows to validated catalog records.
//!
//! The same row shape arrives as JSON from the NocoDB materials table and as CSV from a table
//! export. Technical attributes live in the `especificaciones_tecnicas` JSON column. A row with
//! a missing or out-of-range field is rejected as a whole; nothing is defaulted.

use std::io::Read;
use std::str::FromStr;

use cotiza_types::{
    Battery, BatteryChemistry, Cable, HardwareCategory, HardwareIdentity, HardwareRecord,
    InstallationType, Inverter, InverterType, MountingSystem, Panel, PanelType, ProtectionDevice,
    ProtectionKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::CatalogError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unknown material category '{0}'")]
    UnknownCategory(String),

    #[error("{} record '{id}' is missing field '{field}'", .category.to_config_value())]
    MissingField {
        category: HardwareCategory,
        id: String,
        field: &'static str,
    },

    #[error("record '{id}' has invalid {field}: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: String,
    },

    #[error("record '{id}' has malformed technical specifications: {source}")]
    Specs {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One row of the materials table, column names as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    #[serde(default, alias = "Id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub tipo_material: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub proveedor: Option<String>,
    #[serde(default)]
    pub potencia_watts: Option<f64>,
    #[serde(default)]
    pub potencia_kw: Option<f64>,
    #[serde(default)]
    pub capacidad_kwh: Option<f64>,
    #[serde(default)]
    pub precio_ars: Option<f64>,
    #[serde(default)]
    pub precio_por_kw: Option<f64>,
    #[serde(default)]
    pub precio_por_metro: Option<f64>,
    #[serde(default)]
    pub garantia_anos: Option<u32>,
    #[serde(default)]
    pub activo: Option<bool>,
    /// JSON object, or a string holding one
    #[serde(default)]
    pub especificaciones_tecnicas: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TechnicalSpecs {
    tipo: Option<String>,
    eficiencia: Option<f64>,
    mppt: Option<bool>,
    voltaje: Option<f64>,
    ciclos: Option<u32>,
    tipo_instalacion: Option<String>,
    material: Option<String>,
    seccion_mm2: Option<f64>,
    corriente_a: Option<f64>,
    tension_v: Option<f64>,
}

fn category_from_str(raw: &str) -> Result<HardwareCategory, IngestError> {
    match raw.trim().to_lowercase().as_str() {
        "panel" => Ok(HardwareCategory::Panels),
        "inversor" => Ok(HardwareCategory::Inverters),
        "bateria" | "batería" => Ok(HardwareCategory::Batteries),
        "montaje" => Ok(HardwareCategory::Mounting),
        "cable" => Ok(HardwareCategory::Cables),
        "proteccion" | "protección" => Ok(HardwareCategory::Protection),
        other => HardwareCategory::from_str(other)
            .map_err(|_| IngestError::UnknownCategory(raw.to_owned())),
    }
}

struct RowContext {
    category: HardwareCategory,
    id: String,
}

impl RowContext {
    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, IngestError> {
        value.ok_or_else(|| IngestError::MissingField {
            category: self.category,
            id: self.id.clone(),
            field,
        })
    }

    fn parse<T>(&self, value: Option<String>, field: &'static str) -> Result<T, IngestError>
    where
        T: FromStr<Err = anyhow::Error>,
    {
        let raw = self.require(value, field)?;
        spanish_alias(&raw)
            .parse()
            .map_err(|e: anyhow::Error| IngestError::InvalidField {
                id: self.id.clone(),
                field,
                reason: e.to_string(),
            })
    }
}

/// The materials table is maintained in Spanish; map its labels onto wire values
fn spanish_alias(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
    let mapped = match normalized.as_str() {
        "monocristalino" => "monocrystalline",
        "policristalino" => "polycrystalline",
        "pelicula_delgada" | "película_delgada" => "thin_film",
        "microinversor" => "micro",
        "hibrido" | "híbrido" => "hybrid",
        "litio" => "lithium",
        "plomo_acido" | "plomo_ácido" => "lead_acid",
        "fusible" => "fuse",
        "disyuntor" | "termomagnetica" | "termomagnética" => "breaker",
        "sobretension" | "sobretensión" => "surge_protector",
        "seccionador" => "disconnector",
        "techo_residencial" => "residential_roof",
        "techo_comercial" => "commercial_roof",
        "suelo_residencial" => "residential_ground",
        "suelo_comercial" => "commercial_ground",
        "fachada" => "facade",
        other => other,
    };
    mapped.to_owned()
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MaterialRow {
    /// Convert and validate. The record keeps the row's category-specific price field.
    pub fn into_record(self) -> Result<HardwareRecord, IngestError> {
        let tipo = self
            .tipo_material
            .as_deref()
            .ok_or_else(|| IngestError::UnknownCategory(String::new()))?;
        let category = category_from_str(tipo)?;
        let id = self.id.as_ref().and_then(id_to_string);
        let ctx = RowContext {
            category,
            id: id.clone().unwrap_or_else(|| "<sin id>".to_owned()),
        };

        let identity = HardwareIdentity {
            id: ctx.require(id, "id")?,
            brand: ctx.require(self.marca, "marca")?,
            model: ctx.require(self.modelo, "modelo")?,
            supplier: self.proveedor.filter(|s| !s.trim().is_empty()),
            active: ctx.require(self.activo, "activo")?,
        };

        let specs: TechnicalSpecs = match self.especificaciones_tecnicas {
            None | Some(Value::Null) => TechnicalSpecs::default(),
            Some(Value::String(text)) if text.trim().is_empty() => TechnicalSpecs::default(),
            Some(Value::String(text)) => {
                serde_json::from_str(&text).map_err(|source| IngestError::Specs {
                    id: ctx.id.clone(),
                    source,
                })?
            }
            Some(other) => serde_json::from_value(other).map_err(|source| IngestError::Specs {
                id: ctx.id.clone(),
                source,
            })?,
        };

        let record = match category {
            HardwareCategory::Panels => HardwareRecord::Panel(Panel {
                panel_type: ctx.parse::<PanelType>(specs.tipo, "tipo")?,
                power_watts: whole_watts(&ctx, ctx.require(self.potencia_watts, "potencia_watts")?)?,
                efficiency_percent: ctx.require(specs.eficiencia, "eficiencia")?,
                price_ars: ctx.require(self.precio_ars, "precio_ars")?,
                warranty_years: ctx.require(self.garantia_anos, "garantia_anos")?,
                identity,
            }),
            HardwareCategory::Inverters => HardwareRecord::Inverter(Inverter {
                inverter_type: ctx.parse::<InverterType>(specs.tipo, "tipo")?,
                power_kw: ctx.require(self.potencia_kw, "potencia_kw")?,
                efficiency_percent: ctx.require(specs.eficiencia, "eficiencia")?,
                has_mppt: ctx.require(specs.mppt, "mppt")?,
                price_ars: ctx.require(self.precio_ars, "precio_ars")?,
                warranty_years: ctx.require(self.garantia_anos, "garantia_anos")?,
                identity,
            }),
            HardwareCategory::Batteries => HardwareRecord::Battery(Battery {
                chemistry: ctx.parse::<BatteryChemistry>(specs.tipo, "tipo")?,
                capacity_kwh: ctx.require(self.capacidad_kwh, "capacidad_kwh")?,
                voltage_v: ctx.require(specs.voltaje, "voltaje")?,
                cycles: ctx.require(specs.ciclos, "ciclos")?,
                price_ars: ctx.require(self.precio_ars, "precio_ars")?,
                warranty_years: ctx.require(self.garantia_anos, "garantia_anos")?,
                identity,
            }),
            HardwareCategory::Mounting => HardwareRecord::MountingSystem(MountingSystem {
                installation_type: ctx
                    .parse::<InstallationType>(specs.tipo_instalacion, "tipo_instalacion")?,
                material: ctx.require(specs.material, "material")?,
                price_per_kw: ctx.require(self.precio_por_kw, "precio_por_kw")?,
                warranty_years: ctx.require(self.garantia_anos, "garantia_anos")?,
                identity,
            }),
            HardwareCategory::Cables => HardwareRecord::Cable(Cable {
                section_mm2: ctx.require(specs.seccion_mm2, "seccion_mm2")?,
                price_per_meter: ctx.require(self.precio_por_metro, "precio_por_metro")?,
                identity,
            }),
            HardwareCategory::Protection => HardwareRecord::ProtectionDevice(ProtectionDevice {
                kind: ctx.parse::<ProtectionKind>(specs.tipo, "tipo")?,
                current_rating_a: ctx.require(specs.corriente_a, "corriente_a")?,
                voltage_rating_v: ctx.require(specs.tension_v, "tension_v")?,
                price_ars: ctx.require(self.precio_ars, "precio_ars")?,
                identity,
            }),
        };

        validate_record(&record)?;
        Ok(record)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range checked before the cast"
)]
fn whole_watts(ctx: &RowContext, watts: f64) -> Result<u32, IngestError> {
    if watts.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&watts) {
        return Err(IngestError::InvalidField {
            id: ctx.id.clone(),
            field: "potencia_watts",
            reason: format!("{watts} is not a whole number of watts"),
        });
    }
    Ok(watts as u32)
}

/// Range checks shared by every ingestion path
pub fn validate_record(record: &HardwareRecord) -> Result<(), IngestError> {
    let identity = record.identity();
    let invalid = |field: &'static str, reason: &str| IngestError::InvalidField {
        id: identity.id.clone(),
        field,
        reason: reason.to_owned(),
    };
    let positive = |value: f64, field: &'static str| {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(invalid(field, "must be a positive number"))
        }
    };
    let non_negative = |value: f64, field: &'static str| {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(invalid(field, "must be a non-negative number"))
        }
    };
    let percentage = |value: f64, field: &'static str| {
        if value.is_finite() && value > 0.0 && value <= 100.0 {
            Ok(())
        } else {
            Err(invalid(field, "must be within (0, 100]"))
        }
    };

    if identity.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if identity.brand.trim().is_empty() {
        return Err(invalid("brand", "must not be empty"));
    }
    if identity.model.trim().is_empty() {
        return Err(invalid("model", "must not be empty"));
    }

    match record {
        HardwareRecord::Panel(p) => {
            if p.power_watts == 0 {
                return Err(invalid("power_watts", "must be a positive number"));
            }
            percentage(p.efficiency_percent, "efficiency_percent")?;
            non_negative(p.price_ars, "price_ars")
        }
        HardwareRecord::Inverter(i) => {
            positive(i.power_kw, "power_kw")?;
            percentage(i.efficiency_percent, "efficiency_percent")?;
            non_negative(i.price_ars, "price_ars")
        }
        HardwareRecord::Battery(b) => {
            positive(b.capacity_kwh, "capacity_kwh")?;
            positive(b.voltage_v, "voltage_v")?;
            non_negative(b.price_ars, "price_ars")
        }
        HardwareRecord::MountingSystem(m) => {
            if m.material.trim().is_empty() {
                return Err(invalid("material", "must not be empty"));
            }
            non_negative(m.price_per_kw, "price_per_kw")
        }
        HardwareRecord::Cable(c) => {
            positive(c.section_mm2, "section_mm2")?;
            non_negative(c.price_per_meter, "price_per_meter")
        }
        HardwareRecord::ProtectionDevice(d) => {
            positive(d.current_rating_a, "current_rating_a")?;
            positive(d.voltage_rating_v, "voltage_rating_v")?;
            non_negative(d.price_ars, "price_ars")
        }
    }
}

/// Convert rows, logging and skipping the ones that do not validate
pub fn rows_into_records(rows: impl IntoIterator<Item = MaterialRow>) -> Vec<HardwareRecord> {
    rows.into_iter()
        .filter_map(|row| match row.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Skipping materials row");
                None
            }
        })
        .collect()
}

/// Read a CSV export of the materials table
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<HardwareRecord>, CatalogError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows = csv_reader
        .deserialize::<MaterialRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows_into_records(rows))
}
