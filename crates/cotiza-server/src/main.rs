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

use cotiza_core::{InMemoryCatalog, SharedCatalog};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cotiza_server::api::{self, CatalogState, PricingState, QuoteState};
use cotiza_server::config::ServerConfig;
use cotiza_server::db::Database;
use cotiza_server::nocodb::NocoDbClient;
use cotiza_server::notifications::EmailNotifier;
use cotiza_server::rates::ExchangeRateClient;
use cotiza_server::sync;
use cotiza_server::updater::PriceUpdater;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cotiza_server=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cotiza_server.toml".to_owned());
    info!(path = %config_path, "Loading configuration");
    let config = ServerConfig::from_file(&config_path)?;

    let db = Arc::new(Database::open(&config.database.path)?);
    info!(path = %config.database.path, "Database opened");

    let notifier = Arc::new(EmailNotifier::new(&config.email)?);
    let calculator = Arc::new(config.calculator.build_calculator());

    let catalog = SharedCatalog::new(InMemoryCatalog::with_defaults());
    info!(
        records = catalog.snapshot().len(),
        "Seeded catalog with default price list"
    );

    let nocodb = match &config.nocodb {
        Some(settings) => {
            let client = Arc::new(NocoDbClient::new(settings)?);
            sync::spawn_catalog_sync(
                Arc::clone(&client) as Arc<dyn sync::MaterialsSource>,
                catalog.clone(),
                Duration::from_secs(settings.refresh_interval_secs),
            );
            Some(client)
        }
        None => {
            warn!("NocoDB not configured, serving the default catalog only");
            None
        }
    };

    let rates = Arc::new(ExchangeRateClient::new(&config.pricing)?);
    let updater = Arc::new(PriceUpdater::new(
        rates,
        &config.pricing.cache_path,
        Duration::from_secs(config.pricing.refresh_interval_secs),
        config.pricing.fallback_usd_ars,
    ));
    Arc::clone(&updater).spawn();

    sync::spawn_quote_maintenance(Arc::clone(&db), config.database.expired_retention_days);

    let quote_state = QuoteState {
        db: Arc::clone(&db),
        calculator,
        catalog: catalog.clone(),
        notifier,
        nocodb,
        validity_days: config.calculator.quote_validity_days,
    };
    let catalog_state = CatalogState { catalog };
    let pricing_state = PricingState { updater };

    let app = api::router(quote_state, catalog_state, pricing_state)
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Cotiza server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
