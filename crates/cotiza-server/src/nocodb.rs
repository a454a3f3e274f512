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

//! NocoDB REST client: materials table in, quote mirror out

use cotiza_core::catalog::ingest::{MaterialRow, rows_into_records};
use cotiza_types::{HardwareRecord, QuoteRecord};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::NocoDbSettings;

const PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum NocoDbError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NocoDB returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("no quotes table configured")]
    NoQuotesTable,
}

pub type NocoDbResult<T> = Result<T, NocoDbError>;

#[derive(Debug, Deserialize)]
struct RecordList {
    list: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct NocoDbClient {
    base_url: String,
    token: String,
    materials_table_id: String,
    quotes_table_id: Option<String>,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl NocoDbClient {
    pub fn new(settings: &NocoDbSettings) -> NocoDbResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            token: settings.api_token.clone(),
            materials_table_id: settings.materials_table_id.clone(),
            quotes_table_id: settings.quotes_table_id.clone(),
            client,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        })
    }

    #[must_use]
    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    fn records_url(&self, table_id: &str) -> String {
        format!("{}/api/v2/tables/{table_id}/records", self.base_url)
    }

    /// Every material row that validates. Rows that do not are logged and skipped.
    pub async fn fetch_materials(&self) -> NocoDbResult<Vec<HardwareRecord>> {
        let url = self.records_url(&self.materials_table_id);
        debug!(url = %url, "Fetching materials table");

        let response = self
            .retry_request(|| async {
                self.client
                    .get(&url)
                    .header("xc-token", &self.token)
                    .query(&[("limit", PAGE_LIMIT)])
                    .send()
                    .await
            })
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: RecordList = response
                    .json()
                    .await
                    .map_err(|e| NocoDbError::Decode(e.to_string()))?;
                let total = body.list.len();

                let rows = body
                    .list
                    .into_iter()
                    .filter_map(|raw| match serde_json::from_value::<MaterialRow>(raw) {
                        Ok(row) => Some(row),
                        Err(e) => {
                            warn!(error = %e, "Skipping undecodable materials row");
                            None
                        }
                    })
                    .collect::<Vec<_>>();
                let records = rows_into_records(rows);

                info!(valid = records.len(), total, "Fetched materials from NocoDB");
                Ok(records)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!(status = %status, message = %message, "Materials fetch failed");
                Err(NocoDbError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Mirror a stored quote into the quotes table
    pub async fn save_quote(&self, record: &QuoteRecord) -> NocoDbResult<()> {
        let table_id = self
            .quotes_table_id
            .as_deref()
            .ok_or(NocoDbError::NoQuotesTable)?;
        let url = self.records_url(table_id);
        let payload = quote_row(record);

        let response = self
            .retry_request(|| async {
                self.client
                    .post(&url)
                    .header("xc-token", &self.token)
                    .json(&payload)
                    .send()
                    .await
            })
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(quote_id = %record.quote_id, "Quote mirrored to NocoDB");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            error!(quote_id = %record.quote_id, status = %status, "Quote mirror failed");
            Err(NocoDbError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> NocoDbResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("NocoDB request failed after {attempts} attempts: {e}");
                    return Err(NocoDbError::Http(e));
                }
                Err(e) => {
                    warn!(
                        "NocoDB request failed (attempt {attempts}/{}): {e}. Retrying in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// Quotes-table row, column names as stored
fn quote_row(record: &QuoteRecord) -> Value {
    let request = &record.request;
    let design = &record.design;
    json!({
        "quote_id": record.quote_id.to_string(),
        "nombre_cliente": request.customer.name,
        "email_cliente": request.customer.email.as_deref().unwrap_or_default(),
        "telefono_cliente": request.customer.phone.as_deref().unwrap_or_default(),
        "ubicacion_proyecto": design.location.name,
        "consumo_mensual_kwh": request.monthly_consumption_kwh,
        "tipo_tarifa": request.tariff_type.to_config_value(),
        "area_disponible_m2": request.available_area_m2,
        "tipo_instalacion": request.installation_type.to_config_value(),
        "potencia_requerida_kwp": design.required_power_kwp,
        "cantidad_paneles": design.panel_count(),
        "generacion_mensual_kwh": design.generation.monthly_kwh,
        "ahorro_mensual_ars": design.economics.monthly_savings,
        "inversion_total_ars": design.costs.total_investment,
        "retorno_inversion_anos": design.economics.payback_years,
        "estado_cotizacion": record.status.display_name(),
        "fecha_creacion": record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "valida_hasta": record.valid_until.format("%Y-%m-%d").to_string(),
        "notas_proyecto": request.notes.as_deref().unwrap_or_default(),
    })
}
