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

//! ARS/USD exchange-rate sources, tried in order: BCRA series, blue dollar, configured fallback

use chrono::Utc;
use cotiza_core::pricing::fallback_rate;
use cotiza_types::ExchangeRate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PricingSettings;

pub const BCRA_SOURCE: &str = "BCRA";
pub const BLUE_SOURCE: &str = "dolar-blue";

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned {status}")]
    Status { source_name: &'static str, status: u16 },

    #[error("{source_name} response has no usable rate")]
    NoRate { source_name: &'static str },
}

pub type RatesResult<T> = Result<T, RatesError>;

#[derive(Debug, Deserialize)]
struct BlueResponse {
    blue: BlueQuote,
}

#[derive(Debug, Deserialize)]
struct BlueQuote {
    venta: f64,
}

#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    bcra_url: String,
    blue_url: String,
    fallback_usd_ars: f64,
    client: Client,
}

impl ExchangeRateClient {
    pub fn new(settings: &PricingSettings) -> RatesResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            bcra_url: settings.bcra_url.clone(),
            blue_url: settings.blue_url.clone(),
            fallback_usd_ars: settings.fallback_usd_ars,
            client,
        })
    }

    /// First source that answers with a positive rate. Never fails.
    pub async fn current_rate(&self) -> ExchangeRate {
        match self.bcra_rate().await {
            Ok(rate) => return rate,
            Err(e) => warn!(error = %e, "BCRA rate unavailable, trying blue dollar"),
        }
        match self.blue_rate().await {
            Ok(rate) => return rate,
            Err(e) => warn!(error = %e, "Blue dollar rate unavailable, using fallback"),
        }

        info!(usd_ars = self.fallback_usd_ars, "Using estimated exchange rate");
        fallback_rate(self.fallback_usd_ars, Utc::now())
    }

    /// BCRA series: JSON array of `{d, v}` points, the last one is current
    pub async fn bcra_rate(&self) -> RatesResult<ExchangeRate> {
        let series: Vec<Value> = self.get_json(BCRA_SOURCE, &self.bcra_url).await?;
        let value = series
            .last()
            .and_then(|point| point.get("v"))
            .and_then(Value::as_f64)
            .unwrap_or_default();

        debug!(usd_ars = value, "BCRA rate");
        ExchangeRate::from_usd_ars(value, BCRA_SOURCE, Utc::now()).ok_or(RatesError::NoRate {
            source_name: BCRA_SOURCE,
        })
    }

    pub async fn blue_rate(&self) -> RatesResult<ExchangeRate> {
        let body: BlueResponse = self.get_json(BLUE_SOURCE, &self.blue_url).await?;
        debug!(usd_ars = body.blue.venta, "Blue dollar rate");
        ExchangeRate::from_usd_ars(body.blue.venta, BLUE_SOURCE, Utc::now()).ok_or(
            RatesError::NoRate {
                source_name: BLUE_SOURCE,
            },
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        source_name: &'static str,
        url: &str,
    ) -> RatesResult<T> {
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|_| RatesError::NoRate { source_name }),
            status => Err(RatesError::Status {
                source_name,
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn settings(base: &str) -> PricingSettings {
        PricingSettings {
            bcra_url: format!("{base}/usd_of"),
            blue_url: format!("{base}/v2/latest"),
            fallback_usd_ars: 900.0,
            ..PricingSettings::default()
        }
    }

    #[tokio::test]
    async fn test_bcra_uses_last_point() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/usd_of")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"d": "2025-10-01", "v": 1010.5},
                    {"d": "2025-10-02", "v": 1025.0}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = ExchangeRateClient::new(&settings(&server.url())).unwrap();
        let rate = client.current_rate().await;

        assert!((rate.usd_ars - 1025.0).abs() < f64::EPSILON);
        assert!((rate.ars_usd - 1.0 / 1025.0).abs() < 1e-12);
        assert_eq!(rate.source, BCRA_SOURCE);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_falls_back_to_blue_dollar() {
        let mut server = Server::new_async().await;
        let bcra = server
            .mock("GET", "/usd_of")
            .with_status(503)
            .create_async()
            .await;
        let blue = server
            .mock("GET", "/v2/latest")
            .with_status(200)
            .with_body(json!({"oficial": {"venta": 1000.0}, "blue": {"venta": 1250.0}}).to_string())
            .create_async()
            .await;

        let client = ExchangeRateClient::new(&settings(&server.url())).unwrap();
        let rate = client.current_rate().await;

        assert!((rate.usd_ars - 1250.0).abs() < f64::EPSILON);
        assert_eq!(rate.source, BLUE_SOURCE);
        bcra.assert_async().await;
        blue.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_series_and_zero_blue_use_fallback() {
        let mut server = Server::new_async().await;
        let _bcra = server
            .mock("GET", "/usd_of")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _blue = server
            .mock("GET", "/v2/latest")
            .with_status(200)
            .with_body(json!({"blue": {"venta": 0}}).to_string())
            .create_async()
            .await;

        let client = ExchangeRateClient::new(&settings(&server.url())).unwrap();
        assert!(matches!(
            client.bcra_rate().await,
            Err(RatesError::NoRate { source_name: BCRA_SOURCE })
        ));

        let rate = client.current_rate().await;
        assert!((rate.usd_ars - 900.0).abs() < f64::EPSILON);
        assert_eq!(rate.source, "estimado");
    }

    #[tokio::test]
    async fn test_malformed_blue_body() {
        let mut server = Server::new_async().await;
        let _blue = server
            .mock("GET", "/v2/latest")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = ExchangeRateClient::new(&settings(&server.url())).unwrap();
        assert!(matches!(
            client.blue_rate().await,
            Err(RatesError::NoRate { .. })
        ));
    }
}
