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

use askama::Template;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use chrono::Utc;
use cotiza_core::solar::parse_quote_request;
use cotiza_core::{SharedCatalog, SolarCalculator};
use cotiza_types::{
    InstallationType, LocationSunData, QuoteRecord, QuoteRequest, QuoteStatus, QuoteSummary,
    RoughEstimate, SystemDesign,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{ApiError, ApiResult};
use crate::db::Database;
use crate::document::QuoteDocument;
use crate::nocodb::NocoDbClient;
use crate::notifications::EmailNotifier;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct QuoteState {
    pub db: Arc<Database>,
    pub calculator: Arc<SolarCalculator>,
    pub catalog: SharedCatalog,
    pub notifier: Arc<EmailNotifier>,
    pub nocodb: Option<Arc<NocoDbClient>>,
    pub validity_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub monthly_consumption: f64,
    #[serde(default = "default_estimate_location")]
    pub location: String,
    #[serde(default = "default_estimate_installation")]
    pub installation_type: String,
}

fn default_estimate_location() -> String {
    "buenos-aires".to_owned()
}

fn default_estimate_installation() -> String {
    InstallationType::ResidentialRoof.to_config_value().to_owned()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct QuoteList {
    pub quotes: Vec<QuoteSummary>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid quote id: {raw}")))
}

/// Stored quote that is still valid
fn load_quote(state: &QuoteState, raw_id: &str) -> Result<QuoteRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = state
        .db
        .get_quote(id)
        .map_err(|e| ApiError::internal(&e))?
        .ok_or_else(|| ApiError::not_found(format!("Quote {id} not found")))?;

    if record.is_expired(Utc::now()) {
        return Err(ApiError::new(
            StatusCode::GONE,
            format!("Quote {id} expired on {}", record.valid_until.format("%Y-%m-%d")),
        ));
    }
    Ok(record)
}

fn size(state: &QuoteState, body: Value) -> Result<(QuoteRequest, SystemDesign), ApiError> {
    let request = parse_quote_request(body)?;
    let catalog = state.catalog.snapshot();
    let design = state.calculator.size_system(&request, catalog.as_ref())?;
    Ok((request, design))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn sun_data_handler(
    State(state): State<QuoteState>,
    Path(location): Path<String>,
) -> Json<LocationSunData> {
    Json(state.calculator.location_sun_data(&location))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn estimate_handler(
    State(state): State<QuoteState>,
    query: Result<Query<EstimateQuery>, QueryRejection>,
) -> ApiResult<RoughEstimate> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let installation_type: InstallationType = query
        .installation_type
        .parse()
        .map_err(|e: anyhow::Error| ApiError::bad_request(e.to_string()))?;

    let estimate = state.calculator.estimate(
        query.monthly_consumption,
        &query.location,
        installation_type,
    )?;
    Ok(Json(estimate))
}

/// Size a system without storing anything
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn calculate_handler(
    State(state): State<QuoteState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SystemDesign> {
    let (_, design) = size(&state, json_body(body)?)?;
    Ok(Json(design))
}

/// Size, persist, then notify and mirror in the background
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn create_quote_handler(
    State(state): State<QuoteState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<QuoteRecord> {
    let (request, design) = size(&state, json_body(body)?)?;
    let record = QuoteRecord::new(request, design, Utc::now(), state.validity_days);

    state
        .db
        .insert_quote(&record)
        .map_err(|e| ApiError::internal(&e))?;
    info!(
        quote_id = %record.quote_id,
        location = %record.design.location.key,
        system_power_kw = record.design.system_power_kw,
        total_investment = record.design.costs.total_investment,
        "Quote created"
    );

    spawn_notifications(&state, record.clone());
    if let Some(nocodb) = &state.nocodb {
        let nocodb = Arc::clone(nocodb);
        let mirrored = record.clone();
        tokio::spawn(async move {
            if let Err(e) = nocodb.save_quote(&mirrored).await {
                warn!(quote_id = %mirrored.quote_id, error = %e, "Failed to mirror quote to NocoDB");
            }
        });
    }

    Ok(Json(record))
}

fn spawn_notifications(state: &QuoteState, record: QuoteRecord) {
    let db = Arc::clone(&state.db);
    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        notify_and_log(&db, &notifier, &record).await;
    });
}

/// Sends the customer and sales emails, logging only deliveries that succeeded
async fn notify_and_log(db: &Database, notifier: &EmailNotifier, record: &QuoteRecord) {
    match notifier.send_quote_to_customer(record).await {
        Ok(Some(address)) => {
            if let Err(e) = db.log_notification(record.quote_id, "customer_quote", &[address]) {
                error!(error = %e, "Failed to log customer notification");
            }
            if let Err(e) = db.update_status(record.quote_id, QuoteStatus::Sent) {
                error!(error = %e, "Failed to mark quote as sent");
            }
        }
        Ok(None) => {}
        Err(e) => {
            error!(quote_id = %record.quote_id, error = %e, "Failed to send quote to customer");
        }
    }

    match notifier.send_quote_to_sales(record).await {
        Ok(delivered) if delivered.is_empty() => {
            warn!(quote_id = %record.quote_id, "Quote summary reached no sales recipient");
        }
        Ok(delivered) => {
            if let Err(e) = db.log_notification(record.quote_id, "sales_quote", &delivered) {
                error!(error = %e, "Failed to log sales notification");
            }
        }
        Err(e) => {
            error!(quote_id = %record.quote_id, error = %e, "Failed to send quote to sales");
        }
    }
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn get_quote_handler(
    State(state): State<QuoteState>,
    Path(id): Path<String>,
) -> ApiResult<QuoteRecord> {
    load_quote(&state, &id).map(Json)
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn quote_document_handler(
    State(state): State<QuoteState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let record = load_quote(&state, &id)?;
    let html = QuoteDocument::from_record(&record)
        .render()
        .map_err(|e| ApiError::internal(&anyhow::Error::new(e)))?;
    Ok(Html(html))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn delete_quote_handler(
    State(state): State<QuoteState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let deleted = state
        .db
        .delete_quote(id)
        .map_err(|e| ApiError::internal(&e))?;
    if !deleted {
        return Err(ApiError::not_found(format!("Quote {id} not found")));
    }
    info!(quote_id = %id, "Quote deleted");
    Ok(Json(json!({"ok": true, "quote_id": id})))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn list_quotes_handler(
    State(state): State<QuoteState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<QuoteList> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let (quotes, total) = state
        .db
        .list_quotes(limit, offset)
        .map_err(|e| ApiError::internal(&e))?;
    let has_more = u64::from(offset) + (quotes.len() as u64) < total;

    Ok(Json(QuoteList {
        quotes,
        total,
        limit,
        offset,
        has_more,
    }))
}
