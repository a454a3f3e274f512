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


//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cotiza_types::quote::DEFAULT_LOCATION;
use cotiza_types::{
    ConstructionRequest, ConstructionType, FinishLevel, InstallationType, InverterType, PanelType,
    QuoteRequest, TariffType, UsageType,
};

#[derive(Debug, Parser)]
#[command(name = "cotiza")]
#[command(author, version, about = "Offline solar and construction quote calculator")]
#[command(
    long_about = "Size solar installations and price steel frame buildings without the server.\n\
    \nSolar sizing runs against the built-in Argentine price list or a CSV export of the\n\
    materials table. Nothing is stored and no notifications are sent.\n\
    \nExamples:\n  \
    cotiza estimate --consumption 300                  # Catalog-free preview\n  \
    cotiza size --consumption 300 --area 40            # Full sizing, default catalog\n  \
    cotiza size --consumption 450 --area 60 --battery --catalog materiales.csv\n  \
    cotiza construction --type steel-frame --usage residential --area 100"
)]
pub struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Quick estimate from monthly consumption only
    Estimate(EstimateArgs),

    /// Size, select and price a complete installation
    #[command(
        long_about = "Run the full sizing pipeline: required power, panel and inverter selection,\n\
        optional battery bank, mounting, wiring, protection, costs and payback.\n\
        \nCatalog sources (choose one):\n  \
        - Built-in: default Argentine price list (no flag)\n  \
        - CSV export: --catalog <path> with the NocoDB materials columns\n\
        \nExamples:\n  \
        cotiza size --consumption 300 --area 40\n  \
        cotiza size --consumption 800 --area 120 --tariff commercial --installation commercial-roof\n  \
        cotiza size --consumption 300 --area 40 --battery --autonomy 12"
    )]
    Size(SizeArgs),

    /// List locations with their sun hours and generation factors
    Locations,

    /// Price a prefab construction project
    Construction(ConstructionArgs),
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Monthly consumption in kWh
    #[arg(long, short = 'c')]
    pub consumption: f64,

    /// Location key (buenos-aires, cordoba, santa-fe, mendoza, tucuman, other)
    #[arg(long, short = 'l', default_value = DEFAULT_LOCATION)]
    pub location: String,

    #[arg(long, default_value = "residential_roof", help = "Installation type")]
    pub installation: InstallationType,
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Monthly consumption in kWh
    #[arg(long, short = 'c')]
    pub consumption: f64,

    /// Usable area in m²
    #[arg(long, short = 'a')]
    pub area: f64,

    /// Location key, unknown keys use the generic profile
    #[arg(long, short = 'l', default_value = DEFAULT_LOCATION)]
    pub location: String,

    #[arg(long, default_value = "residential", help = "Tariff class")]
    pub tariff: TariffType,

    #[arg(long, default_value = "residential_roof", help = "Installation type")]
    pub installation: InstallationType,

    #[arg(long, value_name = "TYPE", help = "Preferred panel technology")]
    pub panel_type: Option<PanelType>,

    #[arg(long, value_name = "TYPE", help = "Preferred inverter type")]
    pub inverter_type: Option<InverterType>,

    /// Include a battery bank
    #[arg(long)]
    pub battery: bool,

    /// Hours of autonomy for the battery bank
    #[arg(long, value_name = "HOURS", requires = "battery")]
    pub autonomy: Option<f64>,

    /// CSV export of the materials table
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

impl SizeArgs {
    pub fn to_request(&self) -> QuoteRequest {
        let mut request = QuoteRequest::new(
            self.location.clone(),
            self.consumption,
            self.tariff,
            self.area,
            self.installation,
        );
        request.panel_type_preference = self.panel_type;
        request.inverter_type_preference = self.inverter_type;
        request.battery_backup = self.battery;
        request.battery_autonomy_hours = self.autonomy;
        request
    }
}

#[derive(Debug, Args)]
pub struct ConstructionArgs {
    #[arg(long = "type", value_name = "TYPE", help = "steel_frame, industrial, container or mixed")]
    pub construction_type: ConstructionType,

    #[arg(long, help = "residential, commercial or industrial")]
    pub usage: UsageType,

    #[arg(long, default_value = "standard", help = "basic, standard or premium")]
    pub finish: FinishLevel,

    /// Covered area in m²
    #[arg(long, short = 'a')]
    pub area: f64,

    #[arg(long, default_value_t = 1)]
    pub floors: u32,

    #[arg(long, default_value_t = false)]
    pub terrace: bool,

    #[arg(long, default_value_t = false)]
    pub basement: bool,

    /// Province name, drives the regional multiplier
    #[arg(long, default_value = "Buenos Aires")]
    pub province: String,

    /// Customer name printed on the quote
    #[arg(long, default_value = "Consulta CLI")]
    pub name: String,
}

impl ConstructionArgs {
    pub fn to_request(&self) -> ConstructionRequest {
        ConstructionRequest {
            name: self.name.clone(),
            email: String::new(),
            phone: None,
            construction_type: self.construction_type,
            usage: self.usage,
            finish: self.finish,
            area_m2: self.area,
            floors: self.floors,
            has_terrace: self.terrace,
            has_basement: self.basement,
            province: self.province.clone(),
            city: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cotiza").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn estimate_defaults() {
        let cli = parse(&["estimate", "--consumption", "300"]);
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate command");
        };
        assert!((args.consumption - 300.0).abs() < f64::EPSILON);
        assert_eq!(args.location, "buenos-aires");
        assert_eq!(args.installation, InstallationType::ResidentialRoof);
        assert!(!cli.json);
    }

    #[test]
    fn size_builds_request() {
        let cli = parse(&[
            "size",
            "-c",
            "450",
            "-a",
            "60",
            "--location",
            "cordoba",
            "--tariff",
            "commercial",
            "--installation",
            "commercial-roof",
            "--panel-type",
            "bifacial",
            "--battery",
            "--autonomy",
            "12",
            "--json",
        ]);
        assert!(cli.json);
        let Commands::Size(args) = cli.command else {
            panic!("expected size command");
        };
        let request = args.to_request();
        assert_eq!(request.location, "cordoba");
        assert_eq!(request.tariff_type, TariffType::Commercial);
        assert_eq!(request.installation_type, InstallationType::CommercialRoof);
        assert_eq!(request.panel_type_preference, Some(PanelType::Bifacial));
        assert_eq!(request.inverter_type_preference, None);
        assert!(request.battery_backup);
        assert_eq!(request.battery_autonomy_hours, Some(12.0));
        assert!(args.catalog.is_none());
    }

    #[test]
    fn autonomy_requires_battery() {
        let result = Cli::try_parse_from([
            "cotiza", "size", "-c", "300", "-a", "40", "--autonomy", "12",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let result = Cli::try_parse_from([
            "cotiza", "size", "-c", "300", "-a", "40", "--tariff", "domestic",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["cotiza", "estimate", "-c", "300", "--installation", "roof"]);
        assert!(result.is_err());
    }

    #[test]
    fn construction_defaults() {
        let cli = parse(&[
            "construction",
            "--type",
            "steel_frame",
            "--usage",
            "residential",
            "--area",
            "100",
        ]);
        let Commands::Construction(args) = cli.command else {
            panic!("expected construction command");
        };
        let request = args.to_request();
        assert_eq!(request.construction_type, ConstructionType::SteelFrame);
        assert_eq!(request.finish, FinishLevel::Standard);
        assert_eq!(request.floors, 1);
        assert_eq!(request.province, "Buenos Aires");
        assert!(!request.has_terrace);
    }

    #[test]
    fn locations_takes_no_arguments() {
        let cli = parse(&["locations"]);
        assert!(matches!(cli.command, Commands::Locations));
    }
}
