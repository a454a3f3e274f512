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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::design::SystemDesign;
use crate::enums::{InstallationType, InverterType, PanelType, QuoteStatus, TariffType};

pub const DEFAULT_LOCATION: &str = "buenos-aires";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Customer-supplied parameters for a solar quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub customer: CustomerContact,
    #[serde(default = "default_location")]
    pub location: String,
    pub monthly_consumption_kwh: f64,
    pub tariff_type: TariffType,
    pub available_area_m2: f64,
    pub installation_type: InstallationType,
    #[serde(default)]
    pub panel_type_preference: Option<PanelType>,
    #[serde(default)]
    pub inverter_type_preference: Option<InverterType>,
    #[serde(default)]
    pub battery_backup: bool,
    /// Hours of autonomy the battery bank must cover, 8 when unset
    #[serde(default)]
    pub battery_autonomy_hours: Option<f64>,

    // Carried through to the quote record, not used for sizing
    #[serde(default)]
    pub peak_consumption_kw: Option<f64>,
    #[serde(default)]
    pub roof_orientation: Option<String>,
    #[serde(default)]
    pub roof_inclination_deg: Option<f64>,
    #[serde(default)]
    pub shading_notes: Option<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub financing_required: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_owned()
}

impl QuoteRequest {
    /// Minimal request with every optional field unset
    pub fn new(
        location: impl Into<String>,
        monthly_consumption_kwh: f64,
        tariff_type: TariffType,
        available_area_m2: f64,
        installation_type: InstallationType,
    ) -> Self {
        Self {
            customer: CustomerContact::default(),
            location: location.into(),
            monthly_consumption_kwh,
            tariff_type,
            available_area_m2,
            installation_type,
            panel_type_preference: None,
            inverter_type_preference: None,
            battery_backup: false,
            battery_autonomy_hours: None,
            peak_consumption_kw: None,
            roof_orientation: None,
            roof_inclination_deg: None,
            shading_notes: None,
            budget_range: None,
            financing_required: false,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_battery(mut self, autonomy_hours: Option<f64>) -> Self {
        self.battery_backup = true;
        self.battery_autonomy_hours = autonomy_hours;
        self
    }
}

/// A sized design as persisted and emailed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub quote_id: Uuid,
    pub request: QuoteRequest,
    pub design: SystemDesign,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub status: QuoteStatus,
}

impl QuoteRecord {
    pub fn new(
        request: QuoteRequest,
        design: SystemDesign,
        created_at: DateTime<Utc>,
        validity_days: u32,
    ) -> Self {
        Self {
            quote_id: Uuid::new_v4(),
            request,
            design,
            created_at,
            valid_until: created_at + Duration::days(i64::from(validity_days)),
            status: QuoteStatus::Pending,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == QuoteStatus::Expired || now > self.valid_until
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            quote_id: self.quote_id,
            customer_name: self.request.customer.name.clone(),
            location: self.design.location.key.clone(),
            system_power_kw: self.design.system_power_kw,
            total_investment: self.design.costs.total_investment,
            status: self.status,
            created_at: self.created_at,
            valid_until: self.valid_until,
        }
    }
}

/// Listing row for stored quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub quote_id: Uuid,
    pub customer_name: String,
    pub location: String,
    pub system_power_kw: f64,
    pub total_investment: f64,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}
