//! Emission factor catalog.
//!
//! One immutable `ReferenceData` value owns every lookup table the
//! calculators consult: unit conversions, GWP multipliers, fuel and grid
//! factors, gas vocabularies, and the Scope 3 activity tables. Construct it
//! once (`builtin()` or the YAML loaders) and share it as
//! `Arc<ReferenceData>`; nothing mutates it afterwards.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::gwp::GwpTable;
use crate::units::UnitTable;

pub mod energy;
pub mod gases;
pub mod mobile;
pub mod scope3;
pub mod stationary;

pub use energy::{GridFactor, GridFactors, SteamFactors};
pub use gases::{GasGwp, PurchasedGasFactor, PurchasedGasFactors};
pub use mobile::{MobileFactors, OnRoadVehicle, RoadFuel, YearBracket};
pub use scope3::{
    DisposalRoute, ModeFactor, OffsetFactors, TravelBasis, TravelFactors, WasteFactors,
};
pub use stationary::{FuelFactor, StationaryFactors};

/// Factor resolution failure. A handled condition: calculators surface it
/// as a row error, never as a panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    #[error("no {table} factor for selector '{selector}'")]
    NotFound {
        table: &'static str,
        selector: String,
    },
}

/// The full immutable reference dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    pub units: UnitTable,
    pub gwp: GwpTable,
    pub stationary: StationaryFactors,
    pub mobile: MobileFactors,
    pub grid: GridFactors,
    pub steam: SteamFactors,
    pub refrigerants: GasGwp,
    pub suppressants: GasGwp,
    pub purchased_gases: PurchasedGasFactors,
    pub waste: WasteFactors,
    pub business_travel: TravelFactors,
    pub commuting: TravelFactors,
    pub upstream_transport: TravelFactors,
    pub offsets: OffsetFactors,
}

impl ReferenceData {
    /// Compiled-in dataset carried over from the published factor tables.
    pub fn builtin() -> Self {
        Self {
            units: UnitTable::builtin(),
            gwp: GwpTable::ar4(),
            stationary: StationaryFactors::builtin(),
            mobile: MobileFactors::builtin(),
            grid: GridFactors::builtin(),
            steam: SteamFactors::builtin(),
            refrigerants: GasGwp::refrigerants(),
            suppressants: GasGwp::suppressants(),
            purchased_gases: PurchasedGasFactors::builtin(),
            waste: WasteFactors::builtin(),
            business_travel: TravelFactors::business_travel(),
            commuting: TravelFactors::commuting(),
            upstream_transport: TravelFactors::upstream_transport(),
            offsets: OffsetFactors::builtin(),
        }
    }

    /// Shared handle to the builtin dataset.
    pub fn builtin_shared() -> Arc<Self> {
        Arc::new(Self::builtin())
    }

    /// Parses an alternate dataset from YAML (jurisdictional overrides,
    /// test doubles). The document carries the same shape `to_yaml_string`
    /// emits.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut data: ReferenceData =
            serde_yaml::from_str(content).context("Failed to parse reference data YAML")?;
        data.relabel();
        Ok(data)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data from {}", path.display()))?;
        let data = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse reference data from {}", path.display()))?;
        info!(path = %path.display(), "Loaded reference data");
        Ok(data)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize reference data to YAML")
    }

    /// Vocabulary names are skipped by serde; restore them after
    /// deserialization so factor errors still name their table.
    fn relabel(&mut self) {
        self.refrigerants.relabel("refrigerant");
        self.suppressants.relabel("fire suppressant");
        self.business_travel.relabel("business travel mode");
        self.commuting.relabel("commuting mode");
        self.upstream_transport.relabel("upstream transport mode");
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}
