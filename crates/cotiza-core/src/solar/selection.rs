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

//! Hardware selection policies.
//!
//! Each policy is a plain function over candidate slices in catalog order. Ties always keep the
//! candidate encountered first.

use cotiza_types::{Battery, Cable, InstallationType, Inverter, MountingSystem, Panel, ProtectionDevice};
use tracing::debug;

/// Inverter rating band, relative to realized array power
pub const INVERTER_BAND_MIN: f64 = 0.8;
pub const INVERTER_BAND_MAX: f64 = 1.2;

/// Protection devices used per design (conventionally fuse + breaker)
pub const PROTECTION_DEVICES_PER_DESIGN: usize = 2;

/// First element with the greatest key
fn first_max_by<'a, T>(items: &[&'a T], key: impl Fn(&T) -> f64) -> Option<&'a T> {
    let mut best: Option<&'a T> = None;
    for &item in items {
        if best.is_none_or(|b| key(item) > key(b)) {
            best = Some(item);
        }
    }
    best
}

/// First element with the smallest key
fn first_min_by<'a, T>(items: &[&'a T], key: impl Fn(&T) -> f64) -> Option<&'a T> {
    let mut best: Option<&'a T> = None;
    for &item in items {
        if best.is_none_or(|b| key(item) < key(b)) {
            best = Some(item);
        }
    }
    best
}

/// Preferred subset if non-empty, otherwise every candidate
pub fn prefer<'a, T>(candidates: Vec<&'a T>, preferred: impl Fn(&T) -> bool) -> Vec<&'a T> {
    let matching: Vec<&'a T> = candidates.iter().copied().filter(|c| preferred(c)).collect();
    if matching.is_empty() {
        candidates
    } else {
        matching
    }
}

/// Most powerful panel, regardless of price: fewer physical units over cost
pub fn pick_panel<'a>(panels: &[&'a Panel]) -> Option<&'a Panel> {
    first_max_by(panels, |p| f64::from(p.power_watts))
}

pub fn in_inverter_band(inverter: &Inverter, system_power_kw: f64) -> bool {
    inverter.power_kw >= system_power_kw * INVERTER_BAND_MIN
        && inverter.power_kw <= system_power_kw * INVERTER_BAND_MAX
}

/// Smallest inverter rated within 80-120% of array power; closest rating otherwise
pub fn pick_inverter<'a>(inverters: &[&'a Inverter], system_power_kw: f64) -> Option<&'a Inverter> {
    let in_band: Vec<&'a Inverter> = inverters
        .iter()
        .copied()
        .filter(|i| in_inverter_band(i, system_power_kw))
        .collect();

    if let Some(inverter) = first_min_by(&in_band, |i| i.power_kw) {
        return Some(inverter);
    }

    let closest = first_min_by(inverters, |i| (i.power_kw - system_power_kw).abs());
    if let Some(inverter) = closest {
        debug!(
            system_power_kw,
            inverter_kw = inverter.power_kw,
            "No inverter in rating band, using closest"
        );
    }
    closest
}

/// Smallest battery covering the required capacity; the largest one otherwise
pub fn pick_battery<'a>(batteries: &[&'a Battery], required_kwh: f64) -> Option<&'a Battery> {
    let sufficient: Vec<&'a Battery> = batteries
        .iter()
        .copied()
        .filter(|b| b.capacity_kwh >= required_kwh)
        .collect();

    if let Some(battery) = first_min_by(&sufficient, |b| b.capacity_kwh) {
        return Some(battery);
    }

    let largest = first_max_by(batteries, |b| b.capacity_kwh);
    if let Some(battery) = largest {
        debug!(
            required_kwh,
            capacity_kwh = battery.capacity_kwh,
            "No battery covers the autonomy target, using largest"
        );
    }
    largest
}

/// First system for the installation type, else the first system of any type
pub fn pick_mounting<'a>(
    systems: &[&'a MountingSystem],
    installation_type: InstallationType,
) -> Option<&'a MountingSystem> {
    systems
        .iter()
        .copied()
        .find(|m| m.installation_type == installation_type)
        .or_else(|| systems.first().copied())
}

/// Placeholder policy: the first cable, not sized against current or length
pub fn pick_cable<'a>(cables: &[&'a Cable]) -> Option<&'a Cable> {
    cables.first().copied()
}

/// Placeholder policy: the first two devices, not rated against the array
pub fn pick_protection<'a>(devices: &[&'a ProtectionDevice]) -> Vec<&'a ProtectionDevice> {
    devices
        .iter()
        .copied()
        .take(PROTECTION_DEVICES_PER_DESIGN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotiza_types::{BatteryChemistry, HardwareIdentity, InverterType, PanelType, ProtectionKind};

    fn panel(id: &str, watts: u32, price: f64) -> Panel {
        Panel {
            identity: HardwareIdentity::new(id, "Brand", id),
            panel_type: PanelType::Monocrystalline,
            power_watts: watts,
            efficiency_percent: 21.0,
            price_ars: price,
            warranty_years: 25,
        }
    }

    fn inverter(id: &str, kw: f64) -> Inverter {
        Inverter {
            identity: HardwareIdentity::new(id, "Brand", id),
            inverter_type: InverterType::String,
            power_kw: kw,
            efficiency_percent: 97.0,
            has_mppt: true,
            price_ars: 500_000.0,
            warranty_years: 10,
        }
    }

    fn battery(id: &str, kwh: f64) -> Battery {
        Battery {
            identity: HardwareIdentity::new(id, "Brand", id),
            chemistry: BatteryChemistry::Lithium,
            capacity_kwh: kwh,
            voltage_v: 48.0,
            cycles: 6000,
            price_ars: 1_000_000.0,
            warranty_years: 10,
        }
    }

    fn mounting(id: &str, installation_type: InstallationType) -> MountingSystem {
        MountingSystem {
            identity: HardwareIdentity::new(id, "Brand", id),
            installation_type,
            material: "Aluminio".to_owned(),
            price_per_kw: 100_000.0,
            warranty_years: 12,
        }
    }

    #[test]
    fn test_pick_panel_prefers_wattage_over_price() {
        let cheap = panel("cheap", 330, 90_000.0);
        let big = panel("big", 550, 260_000.0);
        let picked = pick_panel(&[&cheap, &big]).unwrap();
        assert_eq!(picked.identity.id, "big");
    }

    #[test]
    fn test_pick_panel_tie_keeps_first() {
        let a = panel("a", 400, 180_000.0);
        let b = panel("b", 400, 175_000.0);
        assert_eq!(pick_panel(&[&a, &b]).unwrap().identity.id, "a");
        assert!(pick_panel(&[]).is_none());
    }

    #[test]
    fn test_pick_inverter_smallest_in_band() {
        let small = inverter("3k", 3.0);
        let mid = inverter("3.6k", 3.6);
        let large = inverter("5k", 5.0);
        // band for 3.2 kW is [2.56, 3.84]
        let picked = pick_inverter(&[&large, &mid, &small], 3.2).unwrap();
        assert_eq!(picked.identity.id, "3k");
    }

    #[test]
    fn test_pick_inverter_band_is_inclusive() {
        let edge = inverter("edge", 2.4);
        assert!(in_inverter_band(&edge, 2.0));
        assert!(in_inverter_band(&inverter("low", 1.6), 2.0));
        assert!(!in_inverter_band(&inverter("out", 2.41), 2.0));
    }

    #[test]
    fn test_pick_inverter_falls_back_to_closest() {
        let sma = inverter("sma", 5.0);
        let fronius = inverter("fronius", 5.0);
        let tiny = inverter("tiny", 1.0);
        // 2.8 kW: nothing in [2.24, 3.36]; 1 kW is 1.8 away, 5 kW is 2.2 away
        let picked = pick_inverter(&[&sma, &fronius, &tiny], 2.8).unwrap();
        assert_eq!(picked.identity.id, "tiny");

        let picked = pick_inverter(&[&sma, &fronius], 2.8).unwrap();
        assert_eq!(picked.identity.id, "sma");
    }

    #[test]
    fn test_pick_battery_smallest_sufficient() {
        let b5 = battery("5", 5.0);
        let b10 = battery("10", 10.0);
        let b3 = battery("3", 3.0);
        let picked = pick_battery(&[&b10, &b5, &b3], 3.33).unwrap();
        assert_eq!(picked.identity.id, "5");
    }

    #[test]
    fn test_pick_battery_falls_back_to_largest() {
        let b2 = battery("2", 2.4);
        let b3 = battery("3", 3.0);
        let picked = pick_battery(&[&b2, &b3], 3.33).unwrap();
        assert_eq!(picked.identity.id, "3");
    }

    #[test]
    fn test_pick_mounting_matches_installation_type() {
        let roof = mounting("roof", InstallationType::ResidentialRoof);
        let ground = mounting("ground", InstallationType::ResidentialGround);
        let picked = pick_mounting(&[&roof, &ground], InstallationType::ResidentialGround).unwrap();
        assert_eq!(picked.identity.id, "ground");

        let picked = pick_mounting(&[&roof, &ground], InstallationType::Carport).unwrap();
        assert_eq!(picked.identity.id, "roof");
    }

    #[test]
    fn test_pick_protection_takes_first_two() {
        let device = |id: &str, kind| ProtectionDevice {
            identity: HardwareIdentity::new(id, "Brand", id),
            kind,
            current_rating_a: 16.0,
            voltage_rating_v: 1000.0,
            price_ars: 10_000.0,
        };
        let fuse = device("fuse", ProtectionKind::Fuse);
        let breaker = device("breaker", ProtectionKind::Breaker);
        let spd = device("spd", ProtectionKind::SurgeProtector);
        let picked = pick_protection(&[&fuse, &breaker, &spd]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].identity.id, "breaker");
        assert!(pick_protection(&[]).is_empty());
    }

    #[test]
    fn test_prefer_falls_back_to_all() {
        let a = panel("a", 400, 1.0);
        let b = panel("b", 450, 1.0);
        let preferred = prefer(vec![&a, &b], |p| p.power_watts > 500);
        assert_eq!(preferred.len(), 2);
        let preferred = prefer(vec![&a, &b], |p| p.power_watts > 420);
        assert_eq!(preferred.len(), 1);
    }
}
