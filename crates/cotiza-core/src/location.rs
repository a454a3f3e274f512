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

use cotiza_types::{LocationProfile, LocationSunData};

pub const FALLBACK_LOCATION: &str = "other";

const DEFAULT_TEMPERATURE_COEFFICIENT: f64 = -0.35;
const DEFAULT_SYSTEM_LOSSES: f64 = 0.15;

/// Location key -> solar profile, with a guaranteed fallback entry
#[derive(Debug, Clone)]
pub struct LocationTable {
    profiles: Vec<LocationProfile>,
    fallback: LocationProfile,
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::argentina()
    }
}

impl LocationTable {
    /// Build a table from profiles. A profile keyed "other" becomes the fallback;
    /// without one, the first profile is used.
    pub fn new(profiles: Vec<LocationProfile>) -> Option<Self> {
        let fallback = profiles
            .iter()
            .find(|p| p.key == FALLBACK_LOCATION)
            .or_else(|| profiles.first())?
            .clone();
        Some(Self { profiles, fallback })
    }

    /// Sun-hour profiles for the provinces the company operates in
    pub fn argentina() -> Self {
        let profile = |key: &str, name: &str, sun_hours: f64, lat: f64, lon: f64| LocationProfile {
            key: key.to_owned(),
            name: name.to_owned(),
            sun_hours_daily: sun_hours,
            latitude: lat,
            longitude: lon,
            temperature_coefficient: DEFAULT_TEMPERATURE_COEFFICIENT,
            system_losses: DEFAULT_SYSTEM_LOSSES,
        };

        let fallback = profile(FALLBACK_LOCATION, "Otra ubicación", 5.5, -34.0, -58.0);
        let profiles = vec![
            profile("buenos-aires", "Buenos Aires", 5.5, -34.6037, -58.3816),
            profile("cordoba", "Córdoba", 6.0, -31.4201, -64.1888),
            profile("santa-fe", "Santa Fe", 5.8, -31.6333, -60.7000),
            profile("mendoza", "Mendoza", 6.2, -32.8908, -68.8272),
            profile("tucuman", "Tucumán", 5.7, -26.8083, -65.2176),
            fallback.clone(),
        ];

        Self { profiles, fallback }
    }

    /// Resolve a key, falling back to the generic profile for unknown keys
    pub fn resolve(&self, key: &str) -> &LocationProfile {
        self.get(key).unwrap_or(&self.fallback)
    }

    /// Exact lookup after key normalization
    pub fn get(&self, key: &str) -> Option<&LocationProfile> {
        let normalized = normalize_key(key);
        self.profiles.iter().find(|p| p.key == normalized)
    }

    pub fn profiles(&self) -> &[LocationProfile] {
        &self.profiles
    }

    pub fn sun_data(&self, key: &str) -> LocationSunData {
        let location = self.resolve(key).clone();
        LocationSunData {
            monthly_generation_factor: location.sun_hours_daily * 30.0,
            annual_generation_factor: location.sun_hours_daily * 365.0,
            location,
        }
    }
}

/// "Buenos_Aires " -> "buenos-aires"
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['_', ' '], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_location() {
        let table = LocationTable::argentina();
        let profile = table.resolve("mendoza");
        assert_eq!(profile.key, "mendoza");
        assert!((profile.sun_hours_daily - 6.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_normalizes_key() {
        let table = LocationTable::argentina();
        assert_eq!(table.resolve("Buenos_Aires").key, "buenos-aires");
        assert_eq!(table.resolve(" santa fe ").key, "santa-fe");
    }

    #[test]
    fn test_unknown_location_falls_back_to_other() {
        let table = LocationTable::argentina();
        let profile = table.resolve("ushuaia");
        assert_eq!(profile.key, FALLBACK_LOCATION);
        assert!(table.get("ushuaia").is_none());
    }

    #[test]
    fn test_sun_data_factors() {
        let table = LocationTable::argentina();
        let data = table.sun_data("cordoba");
        assert!((data.monthly_generation_factor - 180.0).abs() < 1e-9);
        assert!((data.annual_generation_factor - 2190.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_table_without_other_uses_first_profile() {
        let table = LocationTable::new(vec![LocationProfile {
            key: "salta".to_owned(),
            name: "Salta".to_owned(),
            sun_hours_daily: 6.5,
            latitude: -24.78,
            longitude: -65.41,
            temperature_coefficient: -0.35,
            system_losses: 0.15,
        }])
        .unwrap();
        assert_eq!(table.resolve("anywhere").key, "salta");
        assert!(LocationTable::new(Vec::new()).is_none());
    }
}
