//! Waste generated in operations, by material and disposal route. Scope 3.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::{outcome, Annotated};
use crate::catalog::{DisposalRoute, ReferenceData};
use crate::row::{required_non_negative, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};
use crate::units::{FuelState, UnitClass};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRow {
    pub material: String,
    /// Disposal route label, e.g. "Landfilled".
    pub route: String,
    pub weight: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WasteRow {
    pub fn new(material: &str, route: &str, weight: &str, unit: &str) -> Self {
        Self {
            material: material.to_string(),
            route: route.to_string(),
            weight: weight.to_string(),
            unit: unit.to_string(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for WasteRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct WasteCalculator {
    data: Arc<ReferenceData>,
}

impl WasteCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<WasteRow>) -> CalcOutcome<WasteRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::Waste,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, row: &mut WasteRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let route = required_selector("disposal route", &row.route, &mut errs)
            .and_then(|raw| match DisposalRoute::parse(raw) {
                Some(route) => Some(route),
                None => {
                    errs.push(format!("unknown disposal route: {raw}"));
                    None
                }
            });
        let factor = match (required_selector("material", &row.material, &mut errs), route) {
            (Some(material), Some(route)) => {
                match self.data.waste.resolve(material, route) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        errs.push(e.to_string());
                        None
                    }
                }
            }
            _ => None,
        };

        let unit = row.unit.trim();
        let allowed = FuelState::Solid.allowed_units();
        if !allowed.contains(&unit) {
            errs.push(format!("unit must be one of: {}", allowed.join(", ")));
        }
        let weight = required_non_negative("weight", &row.weight, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (factor, weight) = (factor?, weight?);

        let tons = match self
            .data
            .units
            .convert(weight, unit, "metric ton", UnitClass::Mass)
        {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        debug!(material = %row.material, route = %row.route, tons, "resolved waste stream");
        // Factors are already t CO2e per metric ton of material.
        let co2e_t = tons * factor;
        row.co2e_t = Some(co2e_t);
        Some(co2e_t)
    }
}
