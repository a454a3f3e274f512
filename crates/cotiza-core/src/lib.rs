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

//! Quote calculators for solar installations and steel frame buildings.
//!
//! Everything here is synchronous and free of I/O. The server and CLI construct the tables and
//! catalog explicitly and pass them in.

pub mod catalog;
pub mod construction;
pub mod errors;
pub mod location;
pub mod pricing;
pub mod solar;
pub mod tariff;

pub use catalog::{
    CapacityRange, CatalogError, CatalogSummary, InMemoryCatalog, MaterialsCatalog, SharedCatalog,
};
pub use errors::{QuoteError, Result};
pub use location::LocationTable;
pub use pricing::{CachedPrices, PriceCache};
pub use solar::{EconomicParams, EstimateParams, SolarCalculator};
pub use tariff::TariffTable;
