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

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cotiza_types::{
    Battery, BatteryChemistry, Cable, HardwareCategory, HardwareRecord, InstallationType, Inverter,
    InverterType, MountingSystem, Panel, PanelType, ProtectionDevice, ProtectionKind,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::defaults::default_records;
use super::ingest::validate_record;
use super::{CapacityRange, CatalogError, CatalogSummary, MaterialsCatalog};

/// Catalog snapshot held in memory, records kept in insertion order per category
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    panels: Vec<Panel>,
    inverters: Vec<Inverter>,
    batteries: Vec<Battery>,
    mounting: Vec<MountingSystem>,
    cables: Vec<Cable>,
    protection: Vec<ProtectionDevice>,
    last_updated: Option<DateTime<Utc>>,
}

impl InMemoryCatalog {
    /// Build a catalog from records, dropping any that fail validation
    pub fn from_records(records: impl IntoIterator<Item = HardwareRecord>) -> Self {
        let mut catalog = Self::default();
        let mut rejected = 0usize;
        for record in records {
            if let Err(e) = validate_record(&record) {
                warn!(id = %record.identity().id, error = %e, "Rejecting invalid catalog record");
                rejected += 1;
                continue;
            }
            catalog.push(record);
        }
        if rejected > 0 {
            debug!(rejected, "Catalog built with rejected records");
        }
        catalog
    }

    /// Catalog seeded with the built-in Argentine price list
    pub fn with_defaults() -> Self {
        Self::from_records(default_records())
    }

    #[must_use]
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }

    fn push(&mut self, record: HardwareRecord) {
        match record {
            HardwareRecord::Panel(p) => self.panels.push(p),
            HardwareRecord::Inverter(i) => self.inverters.push(i),
            HardwareRecord::Battery(b) => self.batteries.push(b),
            HardwareRecord::MountingSystem(m) => self.mounting.push(m),
            HardwareRecord::Cable(c) => self.cables.push(c),
            HardwareRecord::ProtectionDevice(d) => self.protection.push(d),
        }
    }

    /// Total records, active or not
    pub fn len(&self) -> usize {
        self.panels.len()
            + self.inverters.len()
            + self.batteries.len()
            + self.mounting.len()
            + self.cables.len()
            + self.protection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Every record, active or not, grouped by category in catalog order
    pub fn all_records(&self) -> Vec<HardwareRecord> {
        self.panels
            .iter()
            .cloned()
            .map(HardwareRecord::Panel)
            .chain(self.inverters.iter().cloned().map(HardwareRecord::Inverter))
            .chain(self.batteries.iter().cloned().map(HardwareRecord::Battery))
            .chain(self.mounting.iter().cloned().map(HardwareRecord::MountingSystem))
            .chain(self.cables.iter().cloned().map(HardwareRecord::Cable))
            .chain(
                self.protection
                    .iter()
                    .cloned()
                    .map(HardwareRecord::ProtectionDevice),
            )
            .collect()
    }

    pub fn summary(&self) -> CatalogSummary {
        let panels = self.get_panels(None, CapacityRange::ANY).len();
        let inverters = self.get_inverters(None, CapacityRange::ANY).len();
        let batteries = self.get_batteries(None, CapacityRange::ANY).len();
        let mounting = self.get_mounting(None).len();
        let cables = self.get_cables(CapacityRange::ANY).len();
        let protection = self.get_protection(None).len();
        CatalogSummary {
            panels,
            inverters,
            batteries,
            mounting,
            cables,
            protection,
            total: panels + inverters + batteries + mounting + cables + protection,
            last_updated: self.last_updated,
        }
    }

    /// Replace the billed price of one record (unit, per kW or per meter by category)
    pub fn update_price(
        &mut self,
        category: HardwareCategory,
        id: &str,
        new_price: f64,
    ) -> Result<f64, CatalogError> {
        if !new_price.is_finite() || new_price < 0.0 {
            return Err(CatalogError::InvalidPrice(new_price));
        }

        let slot = match category {
            HardwareCategory::Panels => find_mut(&mut self.panels, id, |p| &p.identity.id)
                .map(|p| &mut p.price_ars),
            HardwareCategory::Inverters => find_mut(&mut self.inverters, id, |i| &i.identity.id)
                .map(|i| &mut i.price_ars),
            HardwareCategory::Batteries => find_mut(&mut self.batteries, id, |b| &b.identity.id)
                .map(|b| &mut b.price_ars),
            HardwareCategory::Mounting => find_mut(&mut self.mounting, id, |m| &m.identity.id)
                .map(|m| &mut m.price_per_kw),
            HardwareCategory::Cables => find_mut(&mut self.cables, id, |c| &c.identity.id)
                .map(|c| &mut c.price_per_meter),
            HardwareCategory::Protection => {
                find_mut(&mut self.protection, id, |d| &d.identity.id).map(|d| &mut d.price_ars)
            }
        };

        let Some(price) = slot else {
            return Err(CatalogError::NotFound {
                category,
                id: id.to_owned(),
            });
        };
        let old_price = std::mem::replace(price, new_price);
        self.last_updated = Some(Utc::now());
        info!(
            category = category.to_config_value(),
            id,
            old_price,
            new_price,
            "Catalog price updated"
        );
        Ok(old_price)
    }
}

fn find_mut<'a, T>(
    items: &'a mut [T],
    id: &str,
    key: impl Fn(&T) -> &String,
) -> Option<&'a mut T> {
    items.iter_mut().find(|item| key(item) == id)
}

impl MaterialsCatalog for InMemoryCatalog {
    fn get_panels(&self, panel_type: Option<PanelType>, power_w: CapacityRange) -> Vec<&Panel> {
        self.panels
            .iter()
            .filter(|p| p.identity.active)
            .filter(|p| panel_type.is_none_or(|t| p.panel_type == t))
            .filter(|p| power_w.contains(f64::from(p.power_watts)))
            .collect()
    }

    fn get_inverters(
        &self,
        inverter_type: Option<InverterType>,
        power_kw: CapacityRange,
    ) -> Vec<&Inverter> {
        self.inverters
            .iter()
            .filter(|i| i.identity.active)
            .filter(|i| inverter_type.is_none_or(|t| i.inverter_type == t))
            .filter(|i| power_kw.contains(i.power_kw))
            .collect()
    }

    fn get_batteries(
        &self,
        chemistry: Option<BatteryChemistry>,
        capacity_kwh: CapacityRange,
    ) -> Vec<&Battery> {
        self.batteries
            .iter()
            .filter(|b| b.identity.active)
            .filter(|b| chemistry.is_none_or(|c| b.chemistry == c))
            .filter(|b| capacity_kwh.contains(b.capacity_kwh))
            .collect()
    }

    fn get_mounting(&self, installation_type: Option<InstallationType>) -> Vec<&MountingSystem> {
        self.mounting
            .iter()
            .filter(|m| m.identity.active)
            .filter(|m| installation_type.is_none_or(|t| m.installation_type == t))
            .collect()
    }

    fn get_cables(&self, section_mm2: CapacityRange) -> Vec<&Cable> {
        self.cables
            .iter()
            .filter(|c| c.identity.active)
            .filter(|c| section_mm2.contains(c.section_mm2))
            .collect()
    }

    fn get_protection(&self, kind: Option<ProtectionKind>) -> Vec<&ProtectionDevice> {
        self.protection
            .iter()
            .filter(|d| d.identity.active)
            .filter(|d| kind.is_none_or(|k| d.kind == k))
            .collect()
    }
}

/// Catalog shared between request handlers and the sync task.
///
/// Readers take an `Arc` snapshot, so a replacement never waits on an in-flight calculation.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Arc<InMemoryCatalog>>>,
}

impl SharedCatalog {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<InMemoryCatalog> {
        Arc::clone(&self.inner.read())
    }

    pub fn replace(&self, catalog: InMemoryCatalog) {
        *self.inner.write() = Arc::new(catalog);
    }

    /// Copy-on-write price update
    pub fn update_price(
        &self,
        category: HardwareCategory,
        id: &str,
        new_price: f64,
    ) -> Result<f64, CatalogError> {
        let mut guard = self.inner.write();
        let mut next = InMemoryCatalog::clone(&guard);
        let old_price = next.update_price(category, id, new_price)?;
        *guard = Arc::new(next);
        Ok(old_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotiza_types::HardwareIdentity;

    fn panel(id: &str, watts: u32, panel_type: PanelType, active: bool) -> HardwareRecord {
        let mut identity = HardwareIdentity::new(id, "Brand", format!("P{watts}"));
        identity.active = active;
        HardwareRecord::Panel(Panel {
            identity,
            panel_type,
            power_watts: watts,
            efficiency_percent: 20.0,
            price_ars: 100_000.0,
            warranty_years: 25,
        })
    }

    #[test]
    fn test_accessors_return_only_active_records() {
        let catalog = InMemoryCatalog::from_records(vec![
            panel("a", 400, PanelType::Monocrystalline, true),
            panel("b", 450, PanelType::Monocrystalline, false),
        ]);
        let panels = catalog.get_panels(None, CapacityRange::ANY);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].identity.id, "a");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.summary().panels, 1);
    }

    #[test]
    fn test_panel_filters() {
        let catalog = InMemoryCatalog::from_records(vec![
            panel("mono-400", 400, PanelType::Monocrystalline, true),
            panel("poly-330", 330, PanelType::Polycrystalline, true),
            panel("mono-550", 550, PanelType::Monocrystalline, true),
        ]);

        let mono = catalog.get_panels(Some(PanelType::Monocrystalline), CapacityRange::ANY);
        assert_eq!(mono.len(), 2);

        let mid = catalog.get_panels(None, CapacityRange::new(Some(350.0), Some(500.0)));
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].identity.id, "mono-400");
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let catalog = InMemoryCatalog::from_records(vec![
            panel("zero", 0, PanelType::Monocrystalline, true),
            panel("ok", 400, PanelType::Monocrystalline, true),
        ]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_default_catalog_summary() {
        let summary = InMemoryCatalog::with_defaults().summary();
        assert_eq!(summary.panels, 2);
        assert_eq!(summary.inverters, 2);
        assert_eq!(summary.batteries, 1);
        assert_eq!(summary.mounting, 1);
        assert_eq!(summary.cables, 0);
        assert_eq!(summary.protection, 0);
        assert_eq!(summary.total, 6);
    }

    #[test]
    fn test_update_price() {
        let mut catalog = InMemoryCatalog::with_defaults();
        let old = catalog
            .update_price(HardwareCategory::Mounting, "mount-schletter-fsr", 175_000.0)
            .unwrap();
        assert!((old - 150_000.0).abs() < f64::EPSILON);
        let mounting = catalog.get_mounting(None);
        assert!((mounting[0].price_per_kw - 175_000.0).abs() < f64::EPSILON);
        assert!(catalog.last_updated().is_some());
    }

    #[test]
    fn test_update_price_rejects_unknown_id_and_negative_price() {
        let mut catalog = InMemoryCatalog::with_defaults();
        assert!(matches!(
            catalog.update_price(HardwareCategory::Panels, "missing", 1.0),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            catalog.update_price(HardwareCategory::Panels, "panel-jinko-400", -5.0),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_shared_catalog_snapshot_survives_replace() {
        let shared = SharedCatalog::new(InMemoryCatalog::with_defaults());
        let before = shared.snapshot();
        shared.replace(InMemoryCatalog::default());
        assert_eq!(before.summary().total, 6);
        assert!(shared.snapshot().is_empty());
    }

    #[test]
    fn test_shared_catalog_update_price() {
        let shared = SharedCatalog::new(InMemoryCatalog::with_defaults());
        shared
            .update_price(HardwareCategory::Panels, "panel-trina-400", 170_000.0)
            .unwrap();
        let snapshot = shared.snapshot();
        let trina = snapshot
            .get_panels(None, CapacityRange::ANY)
            .into_iter()
            .find(|p| p.identity.id == "panel-trina-400")
            .unwrap();
        assert!((trina.price_ars - 170_000.0).abs() < f64::EPSILON);
    }
}
