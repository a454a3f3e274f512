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


//! Table output for CLI results.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, presets::UTF8_FULL};
use cotiza_types::{
    ConstructionQuote, HardwareIdentity, LocationSunData, RoughEstimate, SystemDesign,
};

/// Formatter for pretty terminal tables
#[derive(Debug)]
pub struct TableFormatter;

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

fn amount(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn model(identity: &HardwareIdentity) -> String {
    format!("{} {}", identity.brand, identity.model)
}

fn key_value_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = new_table();
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

impl TableFormatter {
    pub fn format_estimate(estimate: &RoughEstimate) -> String {
        let mut output = String::new();
        let table = key_value_table(vec![
            ("Location", estimate.location.clone()),
            ("Installation", estimate.installation_type.display_name().to_owned()),
            (
                "Consumption",
                format!("{:.1} kWh/month", estimate.monthly_consumption_kwh),
            ),
            ("Power", format!("{:.2} kWp", estimate.estimated_power_kwp)),
            ("Panels", estimate.estimated_panels.to_string()),
            ("Area", format!("{:.1} m²", estimate.estimated_area_m2)),
            ("Cost", format!("{:.2} ARS", estimate.estimated_cost)),
            ("Annual savings", format!("{:.2} ARS", estimate.annual_savings)),
            ("Payback", format!("{:.1} years", estimate.payback_years)),
            (
                "Generation",
                format!(
                    "{:.1} kWh/day | {:.1} kWh/month | {:.0} kWh/year",
                    estimate.daily_generation_kwh,
                    estimate.monthly_generation_kwh,
                    estimate.yearly_generation_kwh
                ),
            ),
        ]);
        output.push_str(&table.to_string());
        output.push('\n');

        if !estimate.suitable_for_area {
            output.push_str("Warning: the array needs more area than a typical site offers\n");
        }
        output
    }

    #[expect(clippy::too_many_lines)]
    pub fn format_design(design: &SystemDesign) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "System: {:.2} kWp required, {:.2} kW installed in {} ({})\n",
            design.required_power_kwp,
            design.system_power_kw,
            design.location.name,
            design.location.key
        ));

        let mut equipment = new_table();
        equipment.set_header(header(&["Item", "Model", "Qty", "Unit (ARS)", "Total (ARS)"]));
        equipment.add_row(vec![
            Cell::new("Panels"),
            Cell::new(format!(
                "{} ({} W)",
                model(&design.panels.item.identity),
                design.panels.item.power_watts
            )),
            Cell::new(design.panels.quantity),
            amount(design.panels.unit_price),
            amount(design.panels.total_cost),
        ]);
        equipment.add_row(vec![
            Cell::new("Inverters"),
            Cell::new(format!(
                "{} ({:.1} kW)",
                model(&design.inverters.item.identity),
                design.inverters.item.power_kw
            )),
            Cell::new(design.inverters.quantity),
            amount(design.inverters.unit_price),
            amount(design.inverters.total_cost),
        ]);
        if let Some(batteries) = &design.batteries {
            equipment.add_row(vec![
                Cell::new("Batteries"),
                Cell::new(format!(
                    "{} ({:.1} kWh)",
                    model(&batteries.item.identity),
                    batteries.item.capacity_kwh
                )),
                Cell::new(batteries.quantity),
                amount(batteries.unit_price),
                amount(batteries.total_cost),
            ]);
        }
        equipment.add_row(vec![
            Cell::new("Mounting"),
            Cell::new(model(&design.mounting.system.identity)),
            Cell::new(format!("{:.2} kW", design.mounting.billed_power_kw)),
            amount(design.mounting.system.price_per_kw),
            amount(design.mounting.total_cost),
        ]);
        if let Some(cables) = &design.cables {
            equipment.add_row(vec![
                Cell::new("Cables"),
                Cell::new(format!(
                    "{} ({} mm²)",
                    model(&cables.cable.identity),
                    cables.cable.section_mm2
                )),
                Cell::new(format!("{:.0} m", cables.length_m)),
                amount(cables.cable.price_per_meter),
                amount(cables.total_cost),
            ]);
        }
        for device in &design.protection.devices {
            equipment.add_row(vec![
                Cell::new(format!("Protection ({})", device.kind.display_name())),
                Cell::new(model(&device.identity)),
                Cell::new(1),
                amount(device.price_ars),
                amount(device.price_ars),
            ]);
        }
        output.push_str(&equipment.to_string());
        output.push('\n');

        let costs = &design.costs;
        let mut cost_table = new_table();
        cost_table.set_header(header(&["Cost line", "ARS"]));
        for (label, value) in [
            ("Equipment", costs.equipment()),
            ("Installation", costs.installation),
            ("Permits", costs.permits),
        ] {
            cost_table.add_row(vec![Cell::new(label), amount(value)]);
        }
        cost_table.add_row(vec![
            Cell::new("Total investment")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            amount(costs.total_investment).add_attribute(Attribute::Bold),
        ]);
        output.push_str(&cost_table.to_string());
        output.push('\n');

        let economics = &design.economics;
        let generation = &design.generation;
        output.push_str(&format!(
            "Generation: {:.1} kWh/month, {:.0} kWh/year ({:.0}% system efficiency)\n",
            generation.monthly_kwh,
            generation.annual_kwh,
            generation.system_efficiency * 100.0
        ));
        output.push_str(&format!(
            "Savings: {:.2} ARS/month at {:.2} ARS/kWh | Payback: {:.1} years | ROI: {:.1}%\n",
            economics.monthly_savings,
            economics.tariff_rate,
            economics.payback_years,
            economics.roi_percentage
        ));
        output.push_str(&format!(
            "Warranty: {} years | Installation: {} days | Max current: {:.1} A\n",
            design.warranty_years, design.installation_days, design.wiring.max_current_a
        ));

        output
    }

    pub fn format_locations(locations: &[LocationSunData]) -> String {
        let mut table = new_table();
        table.set_header(header(&[
            "Key",
            "Name",
            "Sun hours",
            "Latitude",
            "Longitude",
            "kWh/kWp month",
            "kWh/kWp year",
        ]));
        for data in locations {
            let profile = &data.location;
            table.add_row(vec![
                Cell::new(&profile.key),
                Cell::new(&profile.name),
                Cell::new(format!("{:.1}", profile.sun_hours_daily)),
                Cell::new(format!("{:.4}", profile.latitude)),
                Cell::new(format!("{:.4}", profile.longitude)),
                amount(data.monthly_generation_factor),
                amount(data.annual_generation_factor),
            ]);
        }
        let mut output = table.to_string();
        output.push('\n');
        output
    }

    pub fn format_construction(quote: &ConstructionQuote) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Quote {} for {} (regional multiplier {:.2})\n",
            quote.quote_id, quote.customer, quote.regional_multiplier
        ));

        let costs = &quote.costs;
        let mut cost_table = new_table();
        cost_table.set_header(header(&["Cost line", quote.currency.as_str()]));
        for (label, value) in [
            ("Materials", costs.materials),
            ("Labor", costs.labor),
            ("Transport", costs.transport),
            ("Taxes", costs.taxes),
        ] {
            cost_table.add_row(vec![Cell::new(label), amount(value)]);
        }
        cost_table.add_row(vec![
            Cell::new("Total")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            amount(costs.total).add_attribute(Attribute::Bold),
        ]);
        output.push_str(&cost_table.to_string());
        output.push('\n');

        if !quote.materials.is_empty() {
            let mut materials = new_table();
            materials.set_header(header(&["Material", "Category", "Unit", "Price (ARS)"]));
            for material in &quote.materials {
                materials.add_row(vec![
                    Cell::new(&material.name),
                    Cell::new(&material.category),
                    Cell::new(&material.unit),
                    amount(material.price_ars),
                ]);
            }
            output.push_str(&materials.to_string());
            output.push('\n');
        }

        output.push_str(&format!(
            "Estimated duration: {} | Valid for {} days\n",
            quote.estimated_duration, quote.validity_days
        ));
        for observation in &quote.observations {
            output.push_str(&format!("  - {observation}\n"));
        }
        output
    }
}
