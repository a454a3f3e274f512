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

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use cotiza_core::CachedPrices;
use cotiza_types::UpdaterStatus;
use serde_json::{Value, json};
use tracing::info;

use crate::updater::PriceUpdater;

#[derive(Debug, Clone)]
pub struct PricingState {
    pub updater: Arc<PriceUpdater>,
}

/// Cached rate with the ARS construction prices derived from it
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn exchange_rate_handler(State(state): State<PricingState>) -> Json<CachedPrices> {
    Json(state.updater.current())
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn status_handler(State(state): State<PricingState>) -> Json<UpdaterStatus> {
    Json(state.updater.status())
}

pub async fn force_update_handler(State(state): State<PricingState>) -> Json<Value> {
    info!("Forced price refresh requested");
    let rate = state.updater.refresh().await;
    Json(json!({
        "ok": true,
        "rate": rate,
        "status": state.updater.status(),
    }))
}
