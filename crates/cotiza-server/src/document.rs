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

//! Customer-facing quote document, shared by the HTML route and the customer email

use askama::Template;
use cotiza_types::QuoteRecord;

#[derive(Debug, Template)]
#[template(path = "quote.html")]
pub struct QuoteDocument {
    pub quote_id: String,
    pub customer_name: String,
    pub created_at: String,
    pub valid_until: String,
    pub location: String,
    pub system_power_kw: String,
    pub panel_summary: String,
    pub inverter_summary: String,
    pub battery_summary: Option<String>,
    pub lines: Vec<DocumentLine>,
    pub total_investment: String,
    pub monthly_generation_kwh: String,
    pub annual_generation_kwh: String,
    pub monthly_savings: String,
    pub annual_savings: String,
    pub payback_years: String,
    pub roi_percentage: String,
    pub annual_maintenance: String,
    pub warranty_years: u32,
    pub installation_days: u32,
}

#[derive(Debug)]
pub struct DocumentLine {
    pub concept: String,
    pub quantity: String,
    pub amount: String,
}

/// Argentine peso amount: `$ 1.234.567,89`
#[expect(
    clippy::cast_possible_truncation,
    clippy::integer_division,
    reason = "amounts are rounded to whole cents, far below i64 range"
)]
pub fn format_ars(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{sign}$ {grouped},{:02}", cents % 100)
}

/// Decimal comma with a fixed number of places
pub fn format_decimal(value: f64, places: usize) -> String {
    format!("{value:.places$}").replace('.', ",")
}

impl QuoteDocument {
    pub fn from_record(record: &QuoteRecord) -> Self {
        let design = &record.design;
        let costs = &design.costs;

        let panel = &design.panels.item;
        let inverter = &design.inverters.item;
        let mut lines = vec![
            DocumentLine {
                concept: format!("Paneles {}", panel.identity.label()),
                quantity: design.panels.quantity.to_string(),
                amount: format_ars(costs.panels),
            },
            DocumentLine {
                concept: format!("Inversor {}", inverter.identity.label()),
                quantity: design.inverters.quantity.to_string(),
                amount: format_ars(costs.inverters),
            },
        ];
        if let Some(batteries) = &design.batteries {
            lines.push(DocumentLine {
                concept: format!("Batería {}", batteries.item.identity.label()),
                quantity: batteries.quantity.to_string(),
                amount: format_ars(costs.batteries),
            });
        }
        lines.push(DocumentLine {
            concept: format!("Estructura {}", design.mounting.system.identity.label()),
            quantity: format!("{} kW", format_decimal(design.mounting.billed_power_kw, 2)),
            amount: format_ars(costs.mounting),
        });
        if let Some(cables) = &design.cables {
            lines.push(DocumentLine {
                concept: format!("Cableado {}", cables.cable.identity.label()),
                quantity: format!("{} m", format_decimal(cables.length_m, 1)),
                amount: format_ars(costs.cables),
            });
        }
        if !design.protection.devices.is_empty() {
            lines.push(DocumentLine {
                concept: "Protecciones".to_owned(),
                quantity: design.protection.devices.len().to_string(),
                amount: format_ars(costs.protection),
            });
        }
        lines.push(DocumentLine {
            concept: "Instalación".to_owned(),
            quantity: format!("{} días", design.installation_days),
            amount: format_ars(costs.installation),
        });
        lines.push(DocumentLine {
            concept: "Permisos y trámites".to_owned(),
            quantity: "1".to_owned(),
            amount: format_ars(costs.permits),
        });

        Self {
            quote_id: record.quote_id.to_string(),
            customer_name: record.request.customer.name.clone(),
            created_at: record.created_at.format("%d/%m/%Y").to_string(),
            valid_until: record.valid_until.format("%d/%m/%Y").to_string(),
            location: design.location.name.clone(),
            system_power_kw: format_decimal(design.system_power_kw, 2),
            panel_summary: format!(
                "{} × {} ({} W)",
                design.panels.quantity,
                panel.identity.label(),
                panel.power_watts
            ),
            inverter_summary: format!(
                "{} × {} ({} kW)",
                design.inverters.quantity,
                inverter.identity.label(),
                format_decimal(inverter.power_kw, 1)
            ),
            battery_summary: design.batteries.as_ref().map(|b| {
                format!(
                    "{} × {} ({} kWh)",
                    b.quantity,
                    b.item.identity.label(),
                    format_decimal(b.item.capacity_kwh, 1)
                )
            }),
            lines,
            total_investment: format_ars(costs.total_investment),
            monthly_generation_kwh: format_decimal(design.generation.monthly_kwh, 2),
            annual_generation_kwh: format_decimal(design.generation.annual_kwh, 2),
            monthly_savings: format_ars(design.economics.monthly_savings),
            annual_savings: format_ars(design.economics.annual_savings),
            payback_years: format_decimal(design.economics.payback_years, 1),
            roi_percentage: format_decimal(design.economics.roi_percentage, 1),
            annual_maintenance: format_ars(design.economics.annual_maintenance),
            warranty_years: design.warranty_years,
            installation_days: design.installation_days,
        }
    }
}

/// Plain-text summary for the sales team
pub fn sales_summary(record: &QuoteRecord) -> String {
    let request = &record.request;
    let design = &record.design;
    let customer = &request.customer;

    let mut body = format!(
        "Nueva cotización solar {id}\n\n\
         Cliente: {name}\n\
         Email: {email}\n\
         Teléfono: {phone}\n\
         Ubicación: {location}\n\
         Consumo mensual: {consumption} kWh\n\
         Tipo de tarifa: {tariff}\n\
         Instalación: {installation}\n\n\
         Potencia del sistema: {power} kW\n\
         Paneles: {panels} × {panel}\n\
         Inversores: {inverters} × {inverter}\n\
         Inversión total: {total}\n\
         Ahorro anual: {savings}\n\
         Retorno: {payback} años\n\
         Válida hasta: {valid_until}\n",
        id = record.quote_id,
        name = customer.name,
        email = customer.email.as_deref().unwrap_or("-"),
        phone = customer.phone.as_deref().unwrap_or("-"),
        location = design.location.name,
        consumption = format_decimal(request.monthly_consumption_kwh, 0),
        tariff = request.tariff_type.display_name(),
        installation = request.installation_type.display_name(),
        power = format_decimal(design.system_power_kw, 2),
        panels = design.panels.quantity,
        panel = design.panels.item.identity.label(),
        inverters = design.inverters.quantity,
        inverter = design.inverters.item.identity.label(),
        total = format_ars(design.costs.total_investment),
        savings = format_ars(design.economics.annual_savings),
        payback = format_decimal(design.economics.payback_years, 1),
        valid_until = record.valid_until.format("%d/%m/%Y"),
    );
    if let Some(batteries) = &design.batteries {
        body.push_str(&format!(
            "Baterías: {} × {}\n",
            batteries.quantity,
            batteries.item.identity.label()
        ));
    }
    if request.financing_required {
        body.push_str("El cliente solicita financiación\n");
    }
    if let Some(notes) = &request.notes {
        body.push_str(&format!("\nNotas: {notes}\n"));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cotiza_core::{InMemoryCatalog, SolarCalculator};
    use cotiza_types::{InstallationType, QuoteRequest, TariffType};

    fn sample() -> QuoteRecord {
        let mut request = QuoteRequest::new(
            "buenos-aires",
            300.0,
            TariffType::Residential,
            40.0,
            InstallationType::ResidentialRoof,
        )
        .with_battery(None);
        request.customer.name = "María <Test>".to_owned();
        request.notes = Some("Techo de chapa".to_owned());
        let design = SolarCalculator::default()
            .size_system(&request, &InMemoryCatalog::with_defaults())
            .unwrap();
        QuoteRecord::new(request, design, Utc::now(), 30)
    }

    #[test]
    fn test_format_ars() {
        assert_eq!(format_ars(2_760_000.0), "$ 2.760.000,00");
        assert_eq!(format_ars(999.5), "$ 999,50");
        assert_eq!(format_ars(1_234.567), "$ 1.234,57");
        assert_eq!(format_ars(0.0), "$ 0,00");
        assert_eq!(format_ars(-45_000.0), "-$ 45.000,00");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(17.037, 1), "17,0");
        assert_eq!(format_decimal(2.8, 2), "2,80");
    }

    #[test]
    fn test_document_renders_escaped_html() {
        let record = sample();
        let html = QuoteDocument::from_record(&record).render().unwrap();
        assert!(html.contains(&record.quote_id.to_string()));
        assert!(html.contains("María &lt;Test&gt;"));
        assert!(html.contains("Tesla Powerwall 2"));
        assert!(html.contains("$ 7.260.000,00"));
    }

    #[test]
    fn test_sales_summary() {
        let record = sample();
        let body = sales_summary(&record);
        assert!(body.contains("Cliente: María <Test>"));
        assert!(body.contains("Paneles: 7 × JinkoSolar JKM400M-54HL4-B"));
        assert!(body.contains("Baterías: 1 × Tesla Powerwall 2"));
        assert!(body.contains("Notas: Techo de chapa"));
        assert!(!body.contains("financiación"));
    }
}
