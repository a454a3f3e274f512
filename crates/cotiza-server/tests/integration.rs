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
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use cotiza_core::{
    EconomicParams, EstimateParams, InMemoryCatalog, LocationTable, SharedCatalog,
    SolarCalculator, TariffTable,
};
use cotiza_server::api::{self, CatalogState, PricingState, QuoteState};
use cotiza_server::config::EmailSettings;
use cotiza_server::db::Database;
use cotiza_server::notifications::EmailNotifier;
use cotiza_server::updater::{PriceUpdater, RateSource};
use cotiza_types::{ExchangeRate, InstallationType, QuoteRecord, QuoteRequest, TariffType};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_email() -> EmailSettings {
    EmailSettings {
        smtp_host: "localhost".to_owned(),
        smtp_port: 2525,
        smtp_username: "test".to_owned(),
        smtp_password: "test".to_owned(),
        from_address: "cotiza@example.com".to_owned(),
        use_tls: false,
        sales_recipients: vec!["ventas@example.com".to_owned()],
        send_customer_copy: true,
    }
}

struct FixedRate(f64);

#[async_trait]
impl RateSource for FixedRate {
    async fn current_rate(&self) -> ExchangeRate {
        ExchangeRate::from_usd_ars(self.0, "BCRA", Utc::now()).expect("positive test rate")
    }
}

struct TestServer {
    port: u16,
    db: Arc<Database>,
    client: reqwest::Client,
    _cache_dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_catalog(InMemoryCatalog::with_defaults()).await
    }

    async fn start_with_catalog(catalog: InMemoryCatalog) -> Self {
        Self::start_with(catalog, SolarCalculator::default()).await
    }

    async fn start_with(catalog: InMemoryCatalog, calculator: SolarCalculator) -> Self {
        let db = Arc::new(Database::open(":memory:").expect("Failed to open in-memory database"));
        let notifier =
            Arc::new(EmailNotifier::new(&test_email()).expect("Failed to create test notifier"));
        let catalog = SharedCatalog::new(catalog);

        let cache_dir = tempfile::tempdir().expect("Failed to create cache dir");
        let updater = Arc::new(PriceUpdater::new(
            Arc::new(FixedRate(1050.0)),
            cache_dir.path().join("price_cache.json"),
            Duration::from_secs(3600),
            900.0,
        ));

        let quote_state = QuoteState {
            db: Arc::clone(&db),
            calculator: Arc::new(calculator),
            catalog: catalog.clone(),
            notifier,
            nocodb: None,
            validity_days: 30,
        };
        let app = api::router(
            quote_state,
            CatalogState { catalog },
            PricingState { updater },
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            port,
            db,
            client: reqwest::Client::new(),
            _cache_dir: cache_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET")
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST")
    }

    async fn create_quote(&self, name: &str) -> Value {
        let mut body = quote_body();
        body["customer"]["name"] = json!(name);
        let resp = self.post("/api/solar/quote", &body).await;
        assert_eq!(resp.status(), 200);
        resp.json().await.expect("quote JSON")
    }
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("numeric value");
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn quote_body() -> Value {
    json!({
        "customer": {"name": "Ana Torres", "email": "ana@example.com", "phone": "+54 11 5555-0000"},
        "location": "buenos-aires",
        "monthly_consumption_kwh": 300.0,
        "tariff_type": "residential",
        "available_area_m2": 40.0,
        "installation_type": "residential_roof"
    })
}

fn construction_body() -> Value {
    json!({
        "name": "Juan Gómez",
        "email": "juan@example.com",
        "construction_type": "steel_frame",
        "usage": "residential",
        "finish": "standard",
        "area_m2": 100.0,
        "province": "Buenos Aires"
    })
}

// ---------------------------------------------------------------------------
// Health and catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_catalog_size() {
    let server = TestServer::start().await;

    let resp = server.get("/health").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog_records"], 6);

    let body: Value = server.get("/api/solar/health").await.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["panels"], 2);
    assert_eq!(body["catalog"]["cables"], 0);
}

#[tokio::test]
async fn materials_grouped_and_filtered() {
    let server = TestServer::start().await;

    let all: Value = server.get("/api/solar/materials").await.json().await.unwrap();
    assert_eq!(all["panels"].as_array().unwrap().len(), 2);
    assert_eq!(all["batteries"].as_array().unwrap().len(), 1);
    assert!(all["protection"].as_array().unwrap().is_empty());

    let summary: Value = server
        .get("/api/solar/materials/summary")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(summary["total"], 6);

    let inverters: Value = server
        .get("/api/solar/materials/inverters?type=string&min_power=5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(inverters["count"], 2);

    let none: Value = server
        .get("/api/solar/materials/panels?min_power=500")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(none["count"], 0);
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let server = TestServer::start().await;

    let resp = server.get("/api/solar/materials/turbines").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);

    let resp = server.get("/api/solar/materials/panels?type=perovskite").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn price_update_changes_quotes() {
    let server = TestServer::start().await;
    let catalog: Value = server
        .get("/api/solar/materials/panels")
        .await
        .json()
        .await
        .unwrap();
    let panel_id = catalog["items"][0]["id"].as_str().unwrap().to_owned();

    let resp = server
        .post(
            "/api/solar/materials/update-price",
            &json!({"category": "panels", "id": panel_id, "new_price": 200000.0}),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_close(&body["old_price"], 180_000.0);

    let design: Value = server
        .post("/api/solar/calculate", &quote_body())
        .await
        .json()
        .await
        .unwrap();
    assert_close(&design["costs"]["panels"], 7.0 * 200_000.0);

    let resp = server
        .post(
            "/api/solar/materials/update-price",
            &json!({"category": "panels", "id": "missing", "new_price": 1.0}),
        )
        .await;
    assert_eq!(resp.status(), 404);

    let resp = server
        .post(
            "/api/solar/materials/update-price",
            &json!({"category": "panels", "id": panel_id, "new_price": -5.0}),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sun_data_falls_back_for_unknown_location() {
    let server = TestServer::start().await;

    let body: Value = server
        .get("/api/solar/locations/mendoza/sun-data")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["location"]["key"], "mendoza");

    let resp = server.get("/api/solar/locations/atlantis/sun-data").await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn estimate_needs_no_catalog() {
    let server = TestServer::start_with_catalog(InMemoryCatalog::default()).await;

    let resp = server
        .client
        .post(server.url(
            "/api/solar/estimate?monthly_consumption=300&location=buenos-aires&installation_type=residential_roof",
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["estimated_panels"], 6);
    assert_close(&body["estimated_cost"], 1_760_000.0);

    let resp = server
        .client
        .post(server.url("/api/solar/estimate?monthly_consumption=-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = server
        .client
        .post(server.url("/api/solar/estimate?monthly_consumption=300&installation_type=roof"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn calculate_sizes_without_persisting() {
    let server = TestServer::start().await;

    let resp = server.post("/api/solar/calculate", &quote_body()).await;
    assert_eq!(resp.status(), 200);
    let design: Value = resp.json().await.unwrap();
    assert_eq!(design["panels"]["quantity"], 7);
    assert_close(&design["costs"]["total_investment"], 2_760_000.0);
    assert!(design["batteries"].is_null());

    let (_, total) = server.db.list_quotes(10, 0).unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn invalid_requests_are_bad_request() {
    let server = TestServer::start().await;

    let mut body = quote_body();
    body["monthly_consumption_kwh"] = json!(0.0);
    let resp = server.post("/api/solar/calculate", &body).await;
    assert_eq!(resp.status(), 400);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["ok"], false);
    assert!(error["error"].as_str().unwrap().contains("consumption"));

    let mut body = quote_body();
    body["tariff_type"] = json!("agricultural");
    assert_eq!(server.post("/api/solar/calculate", &body).await.status(), 400);

    let resp = server
        .client
        .post(server.url("/api/solar/quote"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn empty_catalog_is_unavailable() {
    let server = TestServer::start_with_catalog(InMemoryCatalog::default()).await;

    let resp = server.post("/api/solar/quote", &quote_body()).await;
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("panels"));
}

#[tokio::test]
async fn zero_tariff_is_unprocessable() {
    let tariffs = TariffTable {
        residential: 0.0,
        ..TariffTable::default()
    };
    let calculator = SolarCalculator::new(
        LocationTable::argentina(),
        tariffs,
        EconomicParams::default(),
        EstimateParams::default(),
    );
    let server = TestServer::start_with(InMemoryCatalog::with_defaults(), calculator).await;

    let resp = server.post("/api/solar/quote", &quote_body()).await;
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("economics undefined"));

    let (_, total) = server.db.list_quotes(10, 0).unwrap();
    assert_eq!(total, 0);
}

// ---------------------------------------------------------------------------
// Stored quotes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quote_lifecycle() {
    let server = TestServer::start().await;

    let record = server.create_quote("Ana Torres").await;
    let id = record["quote_id"].as_str().unwrap().to_owned();
    assert_eq!(record["status"], "pending");
    assert_eq!(record["request"]["customer"]["name"], "Ana Torres");
    assert_close(&record["design"]["system_power_kw"], 2.8);

    let fetched: Value = server
        .get(&format!("/api/solar/quote/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["quote_id"], id.as_str());
    assert_eq!(fetched["design"]["panels"]["quantity"], 7);

    let resp = server.get(&format!("/api/solar/quote/{id}/document")).await;
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = resp.text().await.unwrap();
    assert!(html.contains("Ana Torres"));
    assert!(html.contains("$ 2.760.000,00"));

    let resp = server
        .client
        .delete(server.url(&format!("/api/solar/quote/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(
        server.get(&format!("/api/solar/quote/{id}")).await.status(),
        404
    );
    let resp = server
        .client
        .delete(server.url(&format!("/api/solar/quote/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let server = TestServer::start().await;

    let resp = server
        .get(&format!("/api/solar/quote/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(resp.status(), 404);

    let resp = server.get("/api/solar/quote/not-a-uuid").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn expired_quote_is_gone() {
    let server = TestServer::start().await;

    let request = QuoteRequest::new(
        "cordoba",
        400.0,
        TariffType::Residential,
        50.0,
        InstallationType::ResidentialRoof,
    );
    let design = SolarCalculator::default()
        .size_system(&request, &InMemoryCatalog::with_defaults())
        .unwrap();
    let record = QuoteRecord::new(
        request,
        design,
        Utc::now() - chrono::Duration::days(45),
        30,
    );
    server.db.insert_quote(&record).unwrap();

    let resp = server
        .get(&format!("/api/solar/quote/{}", record.quote_id))
        .await;
    assert_eq!(resp.status(), 410);
    let resp = server
        .get(&format!("/api/solar/quote/{}/document", record.quote_id))
        .await;
    assert_eq!(resp.status(), 410);
}

#[tokio::test]
async fn quotes_are_paginated() {
    let server = TestServer::start().await;
    for name in ["Uno", "Dos", "Tres"] {
        server.create_quote(name).await;
    }

    let page: Value = server
        .get("/api/solar/quotes?limit=2")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["quotes"].as_array().unwrap().len(), 2);
    assert_eq!(page["has_more"], true);
    assert_eq!(page["quotes"][0]["customer_name"], "Tres");

    let page: Value = server
        .get("/api/solar/quotes?limit=2&offset=2")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["quotes"].as_array().unwrap().len(), 1);
    assert_eq!(page["has_more"], false);

    let page: Value = server
        .get("/api/solar/quotes?limit=500")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["limit"], 100);

    let page: Value = server.get("/api/solar/quotes").await.json().await.unwrap();
    assert_eq!(page["limit"], 10);
}

// ---------------------------------------------------------------------------
// Construction and pricing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn construction_quote_totals_add_up() {
    let server = TestServer::start().await;

    let resp = server
        .post("/api/construction/quote", &construction_body())
        .await;
    assert_eq!(resp.status(), 200);
    let quote: Value = resp.json().await.unwrap();
    let costs = &quote["costs"];
    let sum = costs["materials"].as_f64().unwrap()
        + costs["labor"].as_f64().unwrap()
        + costs["transport"].as_f64().unwrap()
        + costs["taxes"].as_f64().unwrap();
    assert!((costs["total"].as_f64().unwrap() - sum).abs() < 1e-6);
    assert_eq!(quote["validity_days"], 30);
    assert_eq!(quote["estimated_duration"], "1 meses");

    let mut body = construction_body();
    body["area_m2"] = json!(0.0);
    assert_eq!(
        server.post("/api/construction/quote", &body).await.status(),
        400
    );

    let mut body = construction_body();
    body["construction_type"] = json!("adobe");
    assert_eq!(
        server.post("/api/construction/quote", &body).await.status(),
        400
    );
}

#[tokio::test]
async fn exchange_rate_refresh() {
    let server = TestServer::start().await;

    let rate: Value = server.get("/api/rates/exchange").await.json().await.unwrap();
    assert_eq!(rate["rate"]["usd_ars"], 900.0);
    assert_eq!(rate["rate"]["source"], "estimado");

    let status: Value = server.get("/api/updater/status").await.json().await.unwrap();
    assert_eq!(status["running"], false);
    assert!(status["last_update"].is_null());
    assert_eq!(status["update_interval_hours"], 1.0);

    let resp = server.post("/api/updater/force-update", &json!({})).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["rate"]["usd_ars"], 1050.0);

    let rate: Value = server.get("/api/rates/exchange").await.json().await.unwrap();
    assert_eq!(rate["rate"]["source"], "BCRA");
    assert_close(&rate["prices"]["steel_frame_m2"], 105.0 * 1050.0);

    let status: Value = server.get("/api/updater/status").await.json().await.unwrap();
    assert!(!status["last_update"].is_null());
}
