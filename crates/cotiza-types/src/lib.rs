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

pub mod construction;
pub mod design;
pub mod enums;
pub mod hardware;
pub mod location;
pub mod pricing;
pub mod quote;

// Re-export common types for convenience
pub use construction::{ConstructionCosts, ConstructionQuote, ConstructionRequest, MaterialPrice};
pub use design::{
    CableSelection, CostBreakdown, Economics, EnergyGeneration, MountingSelection,
    ProtectionSelection, RoughEstimate, Selection, SystemDesign, WiringEstimate,
};
pub use enums::{
    BatteryChemistry, ConstructionType, FinishLevel, HardwareCategory, InstallationType,
    InverterType, PanelType, ProtectionKind, QuoteStatus, TariffType, UsageType,
};
pub use hardware::{
    Battery, Cable, HardwareIdentity, HardwareRecord, Inverter, MountingSystem, Panel,
    ProtectionDevice,
};
pub use location::{LocationProfile, LocationSunData};
pub use pricing::{ConstructionPrices, ExchangeRate, UpdaterStatus};
pub use quote::{CustomerContact, QuoteRecord, QuoteRequest, QuoteSummary};
