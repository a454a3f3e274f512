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
use cotiza_core::construction;
use cotiza_types::{ConstructionQuote, ConstructionRequest};
use serde_json::Value;
use tracing::info;

use super::{ApiError, ApiResult};

/// Stateless prefab construction quote. Nothing is persisted.
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn construction_quote_handler(Json(body): Json<Value>) -> ApiResult<ConstructionQuote> {
    let request: ConstructionRequest =
        serde_json::from_value(body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let quote = construction::quote(&request)?;

    info!(
        quote_id = %quote.quote_id,
        construction_type = request.construction_type.to_config_value(),
        area_m2 = request.area_m2,
        total = quote.costs.total,
        "Construction quote computed"
    );
    Ok(Json(quote))
}
