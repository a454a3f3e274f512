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

use anyhow::{Context, Result, bail};
use cotiza_core::{EconomicParams, EstimateParams, LocationTable, SolarCalculator, TariffTable};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub email: EmailSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub nocodb: Option<NocoDbSettings>,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub calculator: CalculatorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    pub sales_recipients: Vec<String>,
    #[serde(default = "default_send_customer_copy")]
    pub send_customer_copy: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Expired quotes older than this are deleted
    #[serde(default = "default_expired_retention_days")]
    pub expired_retention_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NocoDbSettings {
    pub base_url: String,
    pub api_token: String,
    pub materials_table_id: String,
    #[serde(default)]
    pub quotes_table_id: Option<String>,
    #[serde(default = "default_catalog_refresh_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_price_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    #[serde(default = "default_fallback_usd_ars")]
    pub fallback_usd_ars: f64,
    #[serde(default = "default_bcra_url")]
    pub bcra_url: String,
    #[serde(default = "default_blue_url")]
    pub blue_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorSettings {
    #[serde(default)]
    pub tariffs: TariffTable,
    #[serde(default)]
    pub economics: EconomicParams,
    #[serde(default)]
    pub estimate: EstimateParams,
    #[serde(default = "default_quote_validity_days")]
    pub quote_validity_days: u32,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8100
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn default_send_customer_copy() -> bool {
    true
}

fn default_db_path() -> String {
    "./data/cotiza.db".to_owned()
}

fn default_expired_retention_days() -> u32 {
    90
}

fn default_catalog_refresh_secs() -> u64 {
    3600
}

fn default_price_refresh_secs() -> u64 {
    6 * 3600
}

fn default_cache_path() -> String {
    "./data/price_cache.json".to_owned()
}

fn default_fallback_usd_ars() -> f64 {
    900.0
}

fn default_bcra_url() -> String {
    "https://api.estadisticasbcra.com/usd_of".to_owned()
}

fn default_blue_url() -> String {
    "https://api.bluelytics.com.ar/v2/latest".to_owned()
}

fn default_quote_validity_days() -> u32 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            expired_retention_days: default_expired_retention_days(),
        }
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_price_refresh_secs(),
            cache_path: default_cache_path(),
            fallback_usd_ars: default_fallback_usd_ars(),
            bcra_url: default_bcra_url(),
            blue_url: default_blue_url(),
        }
    }
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            tariffs: TariffTable::default(),
            economics: EconomicParams::default(),
            estimate: EstimateParams::default(),
            quote_validity_days: default_quote_validity_days(),
        }
    }
}

impl CalculatorSettings {
    pub fn build_calculator(&self) -> SolarCalculator {
        SolarCalculator::new(
            LocationTable::argentina(),
            self.tariffs,
            self.economics,
            self.estimate,
        )
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.email.smtp_host.is_empty() {
            bail!("email.smtp_host must be set");
        }
        if self.email.sales_recipients.is_empty() {
            bail!("email.sales_recipients must contain at least one address");
        }

        let tariffs = &self.calculator.tariffs;
        for (name, rate) in [
            ("residential", tariffs.residential),
            ("commercial", tariffs.commercial),
            ("industrial", tariffs.industrial),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                bail!("calculator.tariffs.{name} must be a non-negative number, got {rate}");
            }
        }

        let ratio = self.calculator.economics.self_consumption_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            bail!("calculator.economics.self_consumption_ratio must be in (0, 1], got {ratio}");
        }
        if self.calculator.economics.installation_kw_per_day <= 0.0 {
            bail!("calculator.economics.installation_kw_per_day must be positive");
        }

        if let Some(nocodb) = &self.nocodb {
            if nocodb.base_url.is_empty() {
                bail!("nocodb.base_url must be set");
            }
            if nocodb.api_token.is_empty() {
                bail!("nocodb.api_token must be set");
            }
            if nocodb.materials_table_id.is_empty() {
                bail!("nocodb.materials_table_id must be set");
            }
        }

        if self.pricing.refresh_interval_secs == 0 {
            bail!("pricing.refresh_interval_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [email]
        smtp_host = "smtp.example.com"
        smtp_username = "cotiza"
        smtp_password = "secret"
        from_address = "Cotizaciones <cotiza@example.com>"
        sales_recipients = ["ventas@example.com"]
    "#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ServerConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8100);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.email.smtp_port, 587);
        assert!(config.email.send_customer_copy);
        assert_eq!(config.database.path, "./data/cotiza.db");
        assert_eq!(config.database.expired_retention_days, 90);
        assert!(config.nocodb.is_none());
        assert_eq!(config.pricing.refresh_interval_secs, 21600);
        assert!((config.pricing.fallback_usd_ars - 900.0).abs() < f64::EPSILON);
        assert_eq!(config.calculator.quote_validity_days, 30);
        assert_eq!(config.calculator.tariffs, TariffTable::default());
        assert_eq!(config.calculator.economics, EconomicParams::default());
    }

    #[test]
    fn test_full_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{MINIMAL}
            [server]
            port = 9000

            [nocodb]
            base_url = "https://nocodb.example.com"
            api_token = "tok"
            materials_table_id = "m123"
            quotes_table_id = "q456"

            [calculator]
            quote_validity_days = 15

            [calculator.tariffs]
            residential = 60.0

            [calculator.economics]
            self_consumption_ratio = 0.8
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9000);
        let nocodb = config.nocodb.unwrap();
        assert_eq!(nocodb.quotes_table_id.as_deref(), Some("q456"));
        assert_eq!(nocodb.refresh_interval_secs, 3600);
        assert_eq!(config.calculator.quote_validity_days, 15);
        assert!((config.calculator.tariffs.residential - 60.0).abs() < f64::EPSILON);
        assert!((config.calculator.tariffs.commercial - 38.0).abs() < f64::EPSILON);
        assert!((config.calculator.economics.self_consumption_ratio - 0.8).abs() < f64::EPSILON);
        assert!(
            (config.calculator.economics.installation_cost_per_kw - 50_000.0).abs() < f64::EPSILON
        );
    }

    #[test]
    fn test_missing_sales_recipients_rejected() {
        let toml = MINIMAL.replace(r#"["ventas@example.com"]"#, "[]");
        let err = ServerConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("sales_recipients"));
    }

    #[test]
    fn test_invalid_self_consumption_rejected() {
        let toml = format!("{MINIMAL}\n[calculator.economics]\nself_consumption_ratio = 1.5\n");
        assert!(ServerConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn test_negative_tariff_rejected() {
        let toml = format!("{MINIMAL}\n[calculator.tariffs]\nindustrial = -1.0\n");
        let err = ServerConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("industrial"));
    }

    #[test]
    fn test_incomplete_nocodb_rejected() {
        let toml = format!(
            "{MINIMAL}\n[nocodb]\nbase_url = \"https://x\"\napi_token = \"\"\nmaterials_table_id = \"m\"\n"
        );
        let err = ServerConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("api_token"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ServerConfig::from_file("/nonexistent/cotiza.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cotiza.toml"));
    }
}
