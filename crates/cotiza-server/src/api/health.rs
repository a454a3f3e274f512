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
use axum::extract::State;
use serde_json::{Value, json};

use super::CatalogState;

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn health_handler(State(state): State<CatalogState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_records": state.catalog.snapshot().len(),
    }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn solar_health_handler(State(state): State<CatalogState>) -> Json<Value> {
    let summary = state.catalog.snapshot().summary();
    let status = if summary.panels > 0 && summary.inverters > 0 && summary.mounting > 0 {
        "healthy"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "service": "solar-calculator",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": summary,
    }))
}
