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

use cotiza_types::{
    Battery, BatteryChemistry, HardwareIdentity, HardwareRecord, InstallationType, Inverter,
    InverterType, MountingSystem, Panel, PanelType,
};

/// Built-in price list used until (or instead of) a remote catalog sync
pub fn default_records() -> Vec<HardwareRecord> {
    vec![
        HardwareRecord::Panel(Panel {
            identity: HardwareIdentity::new("panel-jinko-400", "JinkoSolar", "JKM400M-54HL4-B"),
            panel_type: PanelType::Monocrystalline,
            power_watts: 400,
            efficiency_percent: 20.6,
            price_ars: 180_000.0,
            warranty_years: 25,
        }),
        HardwareRecord::Panel(Panel {
            identity: HardwareIdentity::new("panel-trina-400", "Trina Solar", "TSM-400DE14A(II)"),
            panel_type: PanelType::Monocrystalline,
            power_watts: 400,
            efficiency_percent: 20.4,
            price_ars: 175_000.0,
            warranty_years: 25,
        }),
        HardwareRecord::Inverter(Inverter {
            identity: HardwareIdentity::new("inverter-sma-5000", "SMA", "STP 5000TL-20"),
            inverter_type: InverterType::String,
            power_kw: 5.0,
            efficiency_percent: 98.0,
            has_mppt: true,
            price_ars: 800_000.0,
            warranty_years: 10,
        }),
        HardwareRecord::Inverter(Inverter {
            identity: HardwareIdentity::new("inverter-fronius-primo-5", "Fronius", "Primo 5.0-1"),
            inverter_type: InverterType::String,
            power_kw: 5.0,
            efficiency_percent: 97.9,
            has_mppt: true,
            price_ars: 750_000.0,
            warranty_years: 10,
        }),
        HardwareRecord::Battery(Battery {
            identity: HardwareIdentity::new("battery-powerwall-2", "Tesla", "Powerwall 2"),
            chemistry: BatteryChemistry::Lithium,
            capacity_kwh: 13.5,
            voltage_v: 48.0,
            cycles: 6000,
            price_ars: 4_500_000.0,
            warranty_years: 10,
        }),
        HardwareRecord::MountingSystem(MountingSystem {
            identity: HardwareIdentity::new("mount-schletter-fsr", "Schletter", "FS-R"),
            installation_type: InstallationType::ResidentialRoof,
            material: "Aluminio".to_owned(),
            price_per_kw: 150_000.0,
            warranty_years: 10,
        }),
    ]
}
