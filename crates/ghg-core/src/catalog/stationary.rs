//! Stationary combustion fuel factors.
//!
//! Entries follow the published table layout: CO2 in kg per unit, CH4 and
//! N2O in grams per unit. The gram-scale gases are normalized to kilograms
//! at construction so calculators work in one mass scale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FactorError;
use crate::units::FuelState;

/// Per-unit emission factor for one fuel, all gases in kg per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelFactor {
    pub state: FuelState,
    /// Unit the factor is declared against ("short ton", "scf", "gal").
    pub unit: String,
    pub co2_kg: f64,
    #[serde(default)]
    pub ch4_kg: f64,
    #[serde(default)]
    pub n2o_kg: f64,
    /// Biomass-derived fuel; its CO2 is reported as supplemental
    /// information alongside the scope totals.
    #[serde(default)]
    pub biogenic: bool,
}

impl FuelFactor {
    fn new(state: FuelState, unit: &str, co2_kg: f64, ch4_g: f64, n2o_g: f64) -> Self {
        Self {
            state,
            unit: unit.to_string(),
            co2_kg,
            ch4_kg: ch4_g / 1000.0,
            n2o_kg: n2o_g / 1000.0,
            biogenic: false,
        }
    }

    fn solid(co2_kg: f64, ch4_g: f64, n2o_g: f64) -> Self {
        Self::new(FuelState::Solid, "short ton", co2_kg, ch4_g, n2o_g)
    }

    fn gaseous(co2_kg: f64, ch4_g: f64, n2o_g: f64) -> Self {
        Self::new(FuelState::Gaseous, "scf", co2_kg, ch4_g, n2o_g)
    }

    fn liquid(co2_kg: f64, ch4_g: f64, n2o_g: f64) -> Self {
        Self::new(FuelState::Liquid, "gal", co2_kg, ch4_g, n2o_g)
    }

    fn biomass(mut self) -> Self {
        self.biogenic = true;
        self
    }
}

/// Fuel name → factor table for stationary combustion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationaryFactors {
    fuels: HashMap<String, FuelFactor>,
}

impl StationaryFactors {
    pub fn builtin() -> Self {
        let mut fuels = HashMap::new();
        let mut add = |name: &str, factor: FuelFactor| {
            fuels.insert(name.to_string(), factor);
        };

        // Solid fuels, factors per short ton (CO2 kg, CH4 g, N2O g).
        add("Anthracite Coal", FuelFactor::solid(2602.0, 276.0, 40.0));
        add("Bituminous Coal", FuelFactor::solid(2325.0, 274.0, 40.0));
        add("Sub-bituminous Coal", FuelFactor::solid(1676.0, 190.0, 28.0));
        add("Lignite Coal", FuelFactor::solid(1389.0, 156.0, 23.0));
        add("Mixed Commercial Coal", FuelFactor::solid(2016.0, 235.0, 34.0));
        add("Mixed Electric Power Coal", FuelFactor::solid(1885.0, 217.0, 32.0));
        add("Mixed Industrial Coal", FuelFactor::solid(2116.0, 246.0, 36.0));
        add(
            "Mixed Industrial Coking Coal",
            FuelFactor::solid(2468.0, 289.0, 42.0),
        );
        add("Coal Coke", FuelFactor::solid(2819.0, 273.0, 40.0));
        add("Municipal Solid Waste", FuelFactor::solid(902.0, 318.0, 42.0));
        add("Petroleum Coke Solid", FuelFactor::solid(3072.0, 960.0, 126.0));
        add("Plastics", FuelFactor::solid(2850.0, 1216.0, 160.0));
        add("Tires", FuelFactor::solid(2407.0, 896.0, 118.0));
        add(
            "Agricultural Byproducts",
            FuelFactor::solid(975.0, 264.0, 35.0).biomass(),
        );
        add("Peat", FuelFactor::solid(895.0, 256.0, 34.0).biomass());
        add(
            "Solid Byproducts",
            FuelFactor::solid(1096.0, 332.0, 44.0).biomass(),
        );
        add(
            "Wood and Wood Residuals",
            FuelFactor::solid(1640.0, 126.0, 63.0).biomass(),
        );

        // Gaseous fuels, factors per scf.
        add("Natural Gas", FuelFactor::gaseous(0.05444, 0.00103, 0.0001));
        add("Propane Gas", FuelFactor::gaseous(0.15463, 0.007548, 0.00151));
        add(
            "Landfill Gas",
            FuelFactor::gaseous(0.025254, 0.001552, 0.000306).biomass(),
        );

        // Liquid fuels, factors per gallon.
        add(
            "Distillate Fuel Oil No. 2",
            FuelFactor::liquid(10.21, 0.41, 0.08),
        );
        add(
            "Residual Fuel Oil No. 6",
            FuelFactor::liquid(11.27, 0.45, 0.09),
        );
        add("Kerosene", FuelFactor::liquid(10.15, 0.41, 0.08));
        add(
            "Liquefied Petroleum Gases LPG",
            FuelFactor::liquid(5.68, 0.28, 0.06),
        );
        add("Biodiesel 100", FuelFactor::liquid(9.45, 0.14, 0.01).biomass());
        add("Ethanol 100", FuelFactor::liquid(5.75, 0.09, 0.01).biomass());
        add(
            "Rendered Animal Fat",
            FuelFactor::liquid(8.88, 0.14, 0.01).biomass(),
        );
        add("Vegetable Oil", FuelFactor::liquid(9.79, 0.13, 0.01).biomass());

        Self { fuels }
    }

    pub fn resolve(&self, fuel: &str) -> Result<&FuelFactor, FactorError> {
        self.fuels.get(fuel).ok_or_else(|| FactorError::NotFound {
            table: "stationary fuel",
            selector: fuel.to_string(),
        })
    }

    pub fn fuel_names(&self) -> impl Iterator<Item = &str> {
        self.fuels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fuels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuels.is_empty()
    }
}
