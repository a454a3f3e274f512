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

//! Enumerated request and catalog values.
//!
//! Every enum serializes as snake_case and parses leniently (case, `-` and spaces are
//! normalized) so values coming from forms, CSV exports and NocoDB rows all map the same way.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => ($value:literal, $display:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Human-readable (Spanish) label used in emails and documents
            pub fn display_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $display ),+
                }
            }

            /// Wire value, identical to the serde representation
            pub fn to_config_value(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            pub fn all() -> &'static [$name] {
                &[ $( Self::$variant ),+ ]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.display_name())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
                Self::all()
                    .iter()
                    .copied()
                    .find(|v| v.to_config_value() == normalized)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Unknown {}: '{}'. Supported values: {}",
                            $label,
                            s,
                            Self::all()
                                .iter()
                                .map(|v| v.to_config_value())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    })
            }
        }
    };
}

wire_enum! {
    /// Electricity tariff class of the customer
    pub enum TariffType ("tariff type") {
        Residential => ("residential", "Residencial"),
        Commercial => ("commercial", "Comercial"),
        Industrial => ("industrial", "Industrial"),
    }
}

wire_enum! {
    /// Where and how the array is mounted
    pub enum InstallationType ("installation type") {
        ResidentialRoof => ("residential_roof", "Techo residencial"),
        CommercialRoof => ("commercial_roof", "Techo comercial"),
        ResidentialGround => ("residential_ground", "Suelo residencial"),
        CommercialGround => ("commercial_ground", "Suelo comercial"),
        Carport => ("carport", "Carport"),
        Facade => ("facade", "Fachada"),
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum PanelType ("panel type") {
        #[default]
        Monocrystalline => ("monocrystalline", "Monocristalino"),
        Polycrystalline => ("polycrystalline", "Policristalino"),
        ThinFilm => ("thin_film", "Película delgada"),
        Bifacial => ("bifacial", "Bifacial"),
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum InverterType ("inverter type") {
        /// String inverter fed by series-connected panels
        #[default]
        String => ("string", "String"),
        Micro => ("micro", "Microinversor"),
        Central => ("central", "Central"),
        /// Hybrid inverter with a battery port
        Hybrid => ("hybrid", "Híbrido"),
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum BatteryChemistry ("battery chemistry") {
        #[default]
        Lithium => ("lithium", "Litio"),
        LeadAcid => ("lead_acid", "Plomo ácido"),
        Gel => ("gel", "Gel"),
        Agm => ("agm", "AGM"),
    }
}

wire_enum! {
    pub enum ProtectionKind ("protection kind") {
        Fuse => ("fuse", "Fusible"),
        Breaker => ("breaker", "Disyuntor"),
        SurgeProtector => ("surge_protector", "Protector de sobretensión"),
        Disconnector => ("disconnector", "Seccionador"),
    }
}

wire_enum! {
    /// Materials catalog category, one per hardware record variant
    pub enum HardwareCategory ("hardware category") {
        Panels => ("panels", "Paneles"),
        Inverters => ("inverters", "Inversores"),
        Batteries => ("batteries", "Baterías"),
        Mounting => ("mounting", "Estructura de montaje"),
        Cables => ("cables", "Cables"),
        Protection => ("protection", "Protecciones"),
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum QuoteStatus ("quote status") {
        #[default]
        Pending => ("pending", "Pendiente"),
        Sent => ("sent", "Enviada"),
        Accepted => ("accepted", "Aceptada"),
        Rejected => ("rejected", "Rechazada"),
        Expired => ("expired", "Vencida"),
    }
}

wire_enum! {
    pub enum ConstructionType ("construction type") {
        SteelFrame => ("steel_frame", "Steel frame"),
        Industrial => ("industrial", "Industrial"),
        Container => ("container", "Contenedor"),
        Mixed => ("mixed", "Mixto"),
    }
}

wire_enum! {
    pub enum UsageType ("usage type") {
        Residential => ("residential", "Residencial"),
        Commercial => ("commercial", "Comercial"),
        Industrial => ("industrial", "Industrial"),
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum FinishLevel ("finish level") {
        Basic => ("basic", "Básico"),
        #[default]
        Standard => ("standard", "Estándar"),
        Premium => ("premium", "Premium"),
    }
}
