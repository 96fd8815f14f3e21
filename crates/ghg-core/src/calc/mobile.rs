//! Mobile sources: fleet vehicles and non-road equipment. Scope 1.
//!
//! On-road rows burn a road fuel (CO2 from per-1000-unit intensity) and
//! add CH4/N2O from the vehicle's model-year bracket times miles driven.
//! Non-road rows resolve CO2 from the equipment table and carry no
//! per-mile gases.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{model_year, required_positive, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};
use crate::units::{FuelState, UnitClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadStatus {
    #[serde(rename = "On-Road")]
    OnRoad,
    #[serde(rename = "Non-Road")]
    NonRoad,
}

impl RoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoadStatus::OnRoad => "On-Road",
            RoadStatus::NonRoad => "Non-Road",
        }
    }
}

impl fmt::Display for RoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileRow {
    pub status: RoadStatus,
    pub vehicle: String,
    /// On-road only; resolved against the vehicle's year brackets.
    #[serde(default)]
    pub model_year: String,
    pub quantity: String,
    pub unit: String,
    /// Non-road rows pick from the equipment's fuel list. On-road rows may
    /// leave this empty to use the vehicle's default road fuel, or name an
    /// alternate road fuel (ethanol or biodiesel fleets).
    #[serde(default)]
    pub fuel: String,
    /// On-road only.
    #[serde(default)]
    pub miles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MobileRow {
    pub fn on_road(vehicle: &str, model_year: &str, quantity: &str, unit: &str, miles: &str) -> Self {
        Self {
            status: RoadStatus::OnRoad,
            vehicle: vehicle.to_string(),
            model_year: model_year.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            fuel: String::new(),
            miles: miles.to_string(),
            co2e_t: None,
            error: None,
        }
    }

    pub fn non_road(vehicle: &str, fuel: &str, quantity: &str, unit: &str) -> Self {
        Self {
            status: RoadStatus::NonRoad,
            vehicle: vehicle.to_string(),
            model_year: String::new(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            fuel: fuel.to_string(),
            miles: String::new(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for MobileRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct MobileCalculator {
    data: Arc<ReferenceData>,
}

impl MobileCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<MobileRow>) -> CalcOutcome<MobileRow> {
        let mut total = 0.0;
        let mut biogenic = 0.0;
        for row in &mut rows {
            let computed = match row.status {
                RoadStatus::OnRoad => self.annotate_on_road(row),
                RoadStatus::NonRoad => self.annotate_non_road(row),
            };
            if let Some((co2e_t, bio_t)) = computed {
                total += co2e_t;
                biogenic += bio_t;
            }
        }
        outcome(
            Category::MobileSources,
            rows,
            CategoryTotal::Single { co2e_t: total },
            Some(biogenic),
        )
    }

    fn annotate_on_road(&self, row: &mut MobileRow) -> Option<(f64, f64)> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let vehicle = required_selector("vehicle", &row.vehicle, &mut errs)
            .and_then(|name| match self.data.mobile.on_road_vehicle(name) {
                Ok(v) => Some(v),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        // Empty fuel falls back to the vehicle's mapped road fuel.
        let fuel_name = {
            let chosen = row.fuel.trim();
            if chosen.is_empty() {
                vehicle.map(|v| v.fuel.as_str())
            } else {
                Some(chosen)
            }
        };
        let fuel = fuel_name.and_then(|name| match self.data.mobile.road_fuel(name) {
            Ok(f) => Some(f),
            Err(e) => {
                errs.push(e.to_string());
                None
            }
        });

        let unit = row.unit.trim();
        if let Some(fuel) = fuel {
            let allowed = if fuel.unit == "scf" {
                FuelState::Gaseous.allowed_units()
            } else {
                FuelState::Liquid.allowed_units()
            };
            if !allowed.contains(&unit) {
                errs.push(format!("unit must be one of: {}", allowed.join(", ")));
            }
        }

        let year = model_year("model year", &row.model_year, &mut errs);
        let qty = required_positive("quantity", &row.quantity, &mut errs);
        let miles = required_positive("miles traveled", &row.miles, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (vehicle, fuel) = (vehicle?, fuel?);
        let (year, qty, miles) = (year?, qty?, miles?);

        let based = match self.data.units.convert(qty, unit, &fuel.unit, UnitClass::Volume) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };

        let co2_kg = based * fuel.co2_kg_per_1000 / 1000.0;
        let (ch4_kg, n2o_kg) = match vehicle.bracket_for(year) {
            Some(bracket) => {
                debug!(vehicle = %row.vehicle.trim(), bracket = %bracket.label(), "resolved year bracket");
                (
                    bracket.ch4_g_mi * miles / 1000.0,
                    bracket.n2o_g_mi * miles / 1000.0,
                )
            }
            // Outside every bracket: no per-mile factors published.
            None => (0.0, 0.0),
        };

        let co2e_t = self.data.gwp.co2e_tons(co2_kg, ch4_kg, n2o_kg);
        row.co2e_t = Some(co2e_t);
        let bio_t = if fuel.biogenic { co2_kg / 1000.0 } else { 0.0 };
        Some((co2e_t, bio_t))
    }

    fn annotate_non_road(&self, row: &mut MobileRow) -> Option<(f64, f64)> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let vehicle = required_selector("vehicle", &row.vehicle, &mut errs);
        let fuel = required_selector("fuel", &row.fuel, &mut errs);
        let co2_per_1000 = match (vehicle, fuel) {
            (Some(v), Some(f)) => match self.data.mobile.off_road_fuel(v, f) {
                Ok(c) => Some(c),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            },
            _ => None,
        };

        let unit = row.unit.trim();
        let allowed = FuelState::Liquid.allowed_units();
        if !allowed.contains(&unit) {
            errs.push(format!("unit must be one of: {}", allowed.join(", ")));
        }

        let qty = required_positive("quantity", &row.quantity, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (co2_per_1000, qty) = (co2_per_1000?, qty?);

        let based = match self.data.units.convert(qty, unit, "gal", UnitClass::Volume) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };

        let co2_kg = based * co2_per_1000 / 1000.0;
        let co2e_t = self.data.gwp.co2e_tons(co2_kg, 0.0, 0.0);
        row.co2e_t = Some(co2e_t);
        Some((co2e_t, 0.0))
    }
}
