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


use anyhow::Result;
use clap::Parser;
use cotiza_cli::cli::{self, Cli};
use cotiza_core::SolarCalculator;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cotiza_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let calculator = SolarCalculator::default();
    let output = cli::run(&args, &calculator)?;
    print!("{output}");
    Ok(())
}
