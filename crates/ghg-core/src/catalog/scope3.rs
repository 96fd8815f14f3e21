//! Scope 3 activity factors (waste, travel, commuting, upstream transport)
//! and the offset instrument list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FactorError;

/// How a disposed material leaves the inventory boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposalRoute {
    Landfilled,
    Recycled,
    Combusted,
    Composted,
}

impl DisposalRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisposalRoute::Landfilled => "Landfilled",
            DisposalRoute::Recycled => "Recycled",
            DisposalRoute::Combusted => "Combusted",
            DisposalRoute::Composted => "Composted",
        }
    }

    pub fn all() -> [DisposalRoute; 4] {
        [
            DisposalRoute::Landfilled,
            DisposalRoute::Recycled,
            DisposalRoute::Combusted,
            DisposalRoute::Composted,
        ]
    }

    pub fn parse(label: &str) -> Option<DisposalRoute> {
        Self::all().into_iter().find(|r| r.as_str() == label)
    }
}

impl std::fmt::Display for DisposalRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Material × disposal route → metric tons CO2e per metric ton of material.
/// Combinations with no published factor are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteFactors {
    materials: HashMap<String, HashMap<DisposalRoute, f64>>,
}

impl WasteFactors {
    pub fn builtin() -> Self {
        use DisposalRoute::*;
        let mut materials = HashMap::new();
        let mut add = |name: &str, routes: &[(DisposalRoute, f64)]| {
            materials.insert(name.to_string(), routes.iter().copied().collect());
        };

        add("Copper Wire", &[(Landfilled, 0.02), (Recycled, 0.18)]);
        add("Mixed MSW", &[(Landfilled, 0.58), (Combusted, 0.43)]);
        add("Mixed Recyclables", &[(Recycled, 0.09), (Landfilled, 0.72)]);
        add(
            "Mixed Paper",
            &[(Recycled, 0.07), (Landfilled, 0.86), (Combusted, 0.47)],
        );
        add("Food Waste", &[(Landfilled, 0.55), (Composted, 0.10)]);
        add("Glass", &[(Recycled, 0.03), (Landfilled, 0.02)]);
        add(
            "Mixed Plastics",
            &[(Recycled, 0.21), (Landfilled, 0.02), (Combusted, 2.34)],
        );

        Self { materials }
    }

    pub fn resolve(&self, material: &str, route: DisposalRoute) -> Result<f64, FactorError> {
        let routes = self
            .materials
            .get(material)
            .ok_or_else(|| FactorError::NotFound {
                table: "waste material",
                selector: material.to_string(),
            })?;
        routes.get(&route).copied().ok_or_else(|| FactorError::NotFound {
            table: "waste disposal route",
            selector: format!("{material} / {route}"),
        })
    }

    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}

/// Distance basis a travel or transport factor is declared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelBasis {
    PassengerMile,
    VehicleMile,
    TonMile,
}

impl TravelBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelBasis::PassengerMile => "passenger-mile",
            TravelBasis::VehicleMile => "vehicle-mile",
            TravelBasis::TonMile => "ton-mile",
        }
    }
}

impl std::fmt::Display for TravelBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-mode factor: CO2e kg per unit of the declared basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeFactor {
    pub co2e_kg_per_unit: f64,
    pub basis: TravelBasis,
}

/// Mode name → factor, one instance per travel-shaped category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelFactors {
    /// Not serialized; loaders restore it through `relabel`.
    #[serde(skip)]
    table: &'static str,
    modes: HashMap<String, ModeFactor>,
}

impl TravelFactors {
    fn from_pairs(table: &'static str, pairs: &[(&str, f64, TravelBasis)]) -> Self {
        Self {
            table,
            modes: pairs
                .iter()
                .map(|(name, kg, basis)| {
                    (
                        name.to_string(),
                        ModeFactor {
                            co2e_kg_per_unit: *kg,
                            basis: *basis,
                        },
                    )
                })
                .collect(),
        }
    }

    pub(crate) fn relabel(&mut self, table: &'static str) {
        self.table = table;
    }

    pub fn business_travel() -> Self {
        use TravelBasis::PassengerMile;
        Self::from_pairs(
            "business travel mode",
            &[
                ("Air Travel - Short Haul", 0.15, PassengerMile),
                ("Air Travel - Long Haul", 0.11, PassengerMile),
                ("Rail", 0.04, PassengerMile),
            ],
        )
    }

    pub fn commuting() -> Self {
        use TravelBasis::PassengerMile;
        Self::from_pairs(
            "commuting mode",
            &[
                ("Passenger Car", 0.25, PassengerMile),
                ("Bus", 0.15, PassengerMile),
                ("Train", 0.08, PassengerMile),
            ],
        )
    }

    pub fn upstream_transport() -> Self {
        use TravelBasis::{TonMile, VehicleMile};
        Self::from_pairs(
            "upstream transport mode",
            &[
                ("Truck", 0.15, TonMile),
                ("Rail", 0.04, TonMile),
                ("Ship", 0.02, TonMile),
                ("Medium- and Heavy-Duty Truck", 1.42, VehicleMile),
            ],
        )
    }

    pub fn resolve(&self, mode: &str) -> Result<ModeFactor, FactorError> {
        self.modes
            .get(mode)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: self.table,
                selector: mode.to_string(),
            })
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }
}

/// Offset instruments. Factors are −1: recorded amounts subtract from the
/// gross scope totals at aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetFactors {
    instruments: HashMap<String, f64>,
}

impl OffsetFactors {
    pub fn builtin() -> Self {
        let mut instruments = HashMap::new();
        instruments.insert("Renewable Energy Credits".to_string(), -1.0);
        instruments.insert("Carbon Offsets".to_string(), -1.0);
        Self { instruments }
    }

    pub fn resolve(&self, instrument: &str) -> Result<f64, FactorError> {
        self.instruments
            .get(instrument)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: "offset instrument",
                selector: instrument.to_string(),
            })
    }

    pub fn instrument_names(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }
}
