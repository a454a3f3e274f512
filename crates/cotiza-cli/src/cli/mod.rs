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


//! CLI module for the offline quote calculator.

pub mod args;
pub mod formatters;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cotiza_core::catalog::ingest::records_from_csv;
use cotiza_core::solar::validate_request;
use cotiza_core::{InMemoryCatalog, SolarCalculator, construction};
use serde::Serialize;
use tracing::{debug, info};

pub use args::{Cli, Commands, ConstructionArgs, EstimateArgs, SizeArgs};
pub use formatters::TableFormatter;

/// Built-in price list, or the rows of a CSV export that pass validation
pub fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
    let Some(path) = path else {
        return Ok(InMemoryCatalog::with_defaults());
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
    let records = records_from_csv(file)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    if records.is_empty() {
        bail!("Catalog file {} has no valid rows", path.display());
    }
    info!(path = %path.display(), records = records.len(), "Loaded catalog");
    Ok(InMemoryCatalog::from_records(records))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

/// Execute a parsed command and return what should be printed
pub fn run(cli: &Cli, calculator: &SolarCalculator) -> Result<String> {
    match &cli.command {
        Commands::Estimate(args) => {
            let estimate =
                calculator.estimate(args.consumption, &args.location, args.installation)?;
            debug!(power_kwp = estimate.estimated_power_kwp, "Estimate computed");
            if cli.json {
                to_json(&estimate)
            } else {
                Ok(TableFormatter::format_estimate(&estimate))
            }
        }
        Commands::Size(args) => {
            let request = args.to_request();
            validate_request(&request)?;
            let catalog = load_catalog(args.catalog.as_deref())?;
            let design = calculator.size_system(&request, &catalog)?;
            debug!(
                system_power_kw = design.system_power_kw,
                total_investment = design.costs.total_investment,
                "System sized"
            );
            if cli.json {
                to_json(&design)
            } else {
                Ok(TableFormatter::format_design(&design))
            }
        }
        Commands::Locations => {
            let table = calculator.locations();
            let data: Vec<_> = table
                .profiles()
                .iter()
                .map(|profile| table.sun_data(&profile.key))
                .collect();
            if cli.json {
                to_json(&data)
            } else {
                Ok(TableFormatter::format_locations(&data))
            }
        }
        Commands::Construction(args) => {
            let quote = construction::quote(&args.to_request())?;
            if cli.json {
                to_json(&quote)
            } else {
                Ok(TableFormatter::format_construction(&quote))
            }
        }
    }
}
