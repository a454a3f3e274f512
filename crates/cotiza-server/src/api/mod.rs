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

//! HTTP routes, one state struct per route group

pub mod catalog;
pub mod construction;
pub mod health;
pub mod pricing;
pub mod quotes;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use cotiza_core::QuoteError;
use cotiza_core::catalog::CatalogError;
use serde_json::json;
use tracing::error;

pub use catalog::CatalogState;
pub use pricing::PricingState;
pub use quotes::QuoteState;

/// Handler error rendered as `{"ok": false, "error": ...}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Storage and other internal failures. The detail is logged, not returned.
    pub fn internal(err: &anyhow::Error) -> Self {
        error!(error = %err, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        let status = match err {
            QuoteError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            QuoteError::CatalogExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            QuoteError::EconomicsUndefined { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match err {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::InvalidPrice(_) => StatusCode::BAD_REQUEST,
            CatalogError::Ingest(_) | CatalogError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"ok": false, "error": self.message})),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Full application router
pub fn router(quotes: QuoteState, catalog: CatalogState, pricing: PricingState) -> Router {
    let solar = Router::new()
        .route("/estimate", post(quotes::estimate_handler))
        .route("/calculate", post(quotes::calculate_handler))
        .route("/quote", post(quotes::create_quote_handler))
        .route(
            "/quote/{id}",
            get(quotes::get_quote_handler).delete(quotes::delete_quote_handler),
        )
        .route("/quote/{id}/document", get(quotes::quote_document_handler))
        .route("/quotes", get(quotes::list_quotes_handler))
        .route(
            "/locations/{location}/sun-data",
            get(quotes::sun_data_handler),
        )
        .with_state(quotes)
        .merge(
            Router::new()
                .route("/health", get(health::solar_health_handler))
                .route("/materials", get(catalog::materials_handler))
                .route("/materials/summary", get(catalog::summary_handler))
                .route("/materials/update-price", post(catalog::update_price_handler))
                .route("/materials/{category}", get(catalog::category_handler))
                .with_state(catalog.clone()),
        );

    let pricing_routes = Router::new()
        .route("/api/rates/exchange", get(pricing::exchange_rate_handler))
        .route("/api/updater/status", get(pricing::status_handler))
        .route("/api/updater/force-update", post(pricing::force_update_handler))
        .with_state(pricing);

    Router::new()
        .route("/health", get(health::health_handler).with_state(catalog))
        .route(
            "/api/construction/quote",
            post(construction::construction_quote_handler),
        )
        .nest("/api/solar", solar)
        .merge(pricing_routes)
}
