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

use axum::Json;
use axum::extract::{Path, Query, State};
use cotiza_core::catalog::{CapacityRange, CatalogSummary};
use cotiza_core::{MaterialsCatalog, SharedCatalog};
use cotiza_types::{
    BatteryChemistry, HardwareCategory, InstallationType, InverterType, PanelType, ProtectionKind,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::str::FromStr;

use super::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub struct CatalogState {
    pub catalog: SharedCatalog,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub min_power: Option<f64>,
    pub max_power: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PriceUpdate {
    pub category: String,
    pub id: String,
    pub new_price: f64,
}

fn parse_filter<T: FromStr<Err = anyhow::Error>>(raw: Option<&str>) -> Result<Option<T>, ApiError> {
    raw.map(|s| s.parse::<T>().map_err(|e| ApiError::bad_request(e.to_string())))
        .transpose()
}

fn parse_category(raw: &str) -> Result<HardwareCategory, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Unknown material category: {raw}")))
}

/// Every active record, grouped by category
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn materials_handler(State(state): State<CatalogState>) -> Json<Value> {
    let catalog = state.catalog.snapshot();
    Json(json!({
        "panels": catalog.get_panels(None, CapacityRange::ANY),
        "inverters": catalog.get_inverters(None, CapacityRange::ANY),
        "batteries": catalog.get_batteries(None, CapacityRange::ANY),
        "mounting": catalog.get_mounting(None),
        "cables": catalog.get_cables(CapacityRange::ANY),
        "protection": catalog.get_protection(None),
        "last_updated": catalog.last_updated(),
    }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn summary_handler(State(state): State<CatalogState>) -> Json<CatalogSummary> {
    Json(state.catalog.snapshot().summary())
}

/// One category. `type` is the panel type, inverter type, battery chemistry, mounting
/// installation type or protection kind; the power bounds apply to the category's capacity.
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn category_handler(
    State(state): State<CatalogState>,
    Path(category): Path<String>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Value> {
    let category = parse_category(&category)?;
    let range = CapacityRange::new(filter.min_power, filter.max_power);
    let kind = filter.kind.as_deref();
    let catalog = state.catalog.snapshot();

    let items = match category {
        HardwareCategory::Panels => {
            json!(catalog.get_panels(parse_filter::<PanelType>(kind)?, range))
        }
        HardwareCategory::Inverters => {
            json!(catalog.get_inverters(parse_filter::<InverterType>(kind)?, range))
        }
        HardwareCategory::Batteries => {
            json!(catalog.get_batteries(parse_filter::<BatteryChemistry>(kind)?, range))
        }
        HardwareCategory::Mounting => {
            json!(catalog.get_mounting(parse_filter::<InstallationType>(kind)?))
        }
        HardwareCategory::Cables => json!(catalog.get_cables(range)),
        HardwareCategory::Protection => {
            json!(catalog.get_protection(parse_filter::<ProtectionKind>(kind)?))
        }
    };
    let count = items.as_array().map_or(0, Vec::len);

    Ok(Json(json!({
        "category": category.to_config_value(),
        "count": count,
        "items": items,
    })))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn update_price_handler(
    State(state): State<CatalogState>,
    Json(update): Json<PriceUpdate>,
) -> ApiResult<Value> {
    let category: HardwareCategory = update
        .category
        .parse()
        .map_err(|e: anyhow::Error| ApiError::bad_request(e.to_string()))?;
    let old_price = state
        .catalog
        .update_price(category, &update.id, update.new_price)?;
    Ok(Json(json!({
        "ok": true,
        "category": category.to_config_value(),
        "id": update.id,
        "old_price": old_price,
        "new_price": update.new_price,
    })))
}
