//! Stationary combustion: fuel burned on site in boilers, furnaces,
//! turbines. Scope 1.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{required_positive, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationaryRow {
    pub fuel: String,
    /// Raw form input; empty means not provided.
    pub quantity: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StationaryRow {
    pub fn new(fuel: &str, quantity: &str, unit: &str) -> Self {
        Self {
            fuel: fuel.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for StationaryRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct StationaryCalculator {
    data: Arc<ReferenceData>,
}

impl StationaryCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<StationaryRow>) -> CalcOutcome<StationaryRow> {
        let mut total = 0.0;
        let mut biogenic = 0.0;
        for row in &mut rows {
            if let Some((co2e_t, bio_t)) = self.annotate(row) {
                total += co2e_t;
                biogenic += bio_t;
            }
        }
        outcome(
            Category::StationaryCombustion,
            rows,
            CategoryTotal::Single { co2e_t: total },
            Some(biogenic),
        )
    }

    /// Returns `(co2e_t, biogenic_co2_t)` for a valid row; annotates and
    /// returns None otherwise.
    fn annotate(&self, row: &mut StationaryRow) -> Option<(f64, f64)> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let factor = required_selector("fuel", &row.fuel, &mut errs)
            .and_then(|fuel| match self.data.stationary.resolve(fuel) {
                Ok(f) => Some(f),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let unit = row.unit.trim();
        if let Some(factor) = factor {
            let allowed = factor.state.allowed_units();
            if !allowed.contains(&unit) {
                errs.push(format!("unit must be one of: {}", allowed.join(", ")));
            }
        }

        let qty = required_positive("quantity", &row.quantity, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let factor = factor?;
        let qty = qty?;

        let class = factor.state.unit_class();
        let based = match self.data.units.convert(qty, unit, &factor.unit, class) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        debug!(fuel = %row.fuel.trim(), qty = based, unit = %factor.unit, "resolved stationary fuel");

        let co2_kg = based * factor.co2_kg;
        let ch4_kg = based * factor.ch4_kg;
        let n2o_kg = based * factor.n2o_kg;
        let co2e_t = self.data.gwp.co2e_tons(co2_kg, ch4_kg, n2o_kg);
        row.co2e_t = Some(co2e_t);

        let bio_t = if factor.biogenic { co2_kg / 1000.0 } else { 0.0 };
        Some((co2e_t, bio_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> StationaryCalculator {
        StationaryCalculator::new(ReferenceData::builtin_shared())
    }

    #[test]
    fn kerosene_thousand_gallons() {
        let out = calculator().calculate(vec![StationaryRow::new("Kerosene", "1000", "gal")]);
        let result = out.result.expect("clean rows produce a result");
        let CategoryTotal::Single { co2e_t } = result.total else {
            panic!("stationary total is single-valued");
        };
        // 10150 kg CO2 + 0.41 kg CH4 + 0.08 kg N2O -> 10.184 t CO2e
        assert!((co2e_t - 10.184).abs() < 1e-3);
        assert!((out.rows[0].co2e_t.unwrap() - co2e_t).abs() < 1e-12);
        assert_eq!(result.biogenic_co2_t, Some(0.0));
    }

    #[test]
    fn liters_convert_to_the_gallon_basis() {
        let gallons = calculator().calculate(vec![StationaryRow::new("Kerosene", "1000", "gal")]);
        let liters = calculator().calculate(vec![StationaryRow::new("Kerosene", "3785.41", "L")]);
        let a = gallons.rows[0].co2e_t.unwrap();
        let b = liters.rows[0].co2e_t.unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn wood_reports_biogenic_supplemental_and_counts_in_total() {
        let out = calculator().calculate(vec![StationaryRow::new(
            "Wood and Wood Residuals",
            "2",
            "short ton",
        )]);
        let result = out.result.unwrap();
        let CategoryTotal::Single { co2e_t } = result.total else {
            panic!("stationary total is single-valued");
        };
        // 3280 kg CO2 + 0.252 kg CH4 + 0.126 kg N2O
        assert!((co2e_t - 3.323848).abs() < 1e-6);
        assert!((result.biogenic_co2_t.unwrap() - 3.28).abs() < 1e-9);
    }

    #[test]
    fn solid_fuel_rejects_volume_units() {
        let out = calculator().calculate(vec![StationaryRow::new("Anthracite Coal", "5", "gal")]);
        assert!(out.result.is_none());
        let error = out.rows[0].error.as_deref().unwrap();
        assert!(error.contains("unit must be one of"));
        assert!(error.contains("short ton"));
    }

    #[test]
    fn every_field_failure_is_reported_at_once() {
        let out = calculator().calculate(vec![StationaryRow::new("", "-3", "gal")]);
        let error = out.rows[0].error.as_deref().unwrap();
        assert!(error.contains("fuel is required"));
        assert!(error.contains("quantity must be greater than zero"));
        assert!(error.contains("; "));
    }

    #[test]
    fn unknown_fuel_is_a_row_error() {
        let out = calculator().calculate(vec![StationaryRow::new("Unobtainium", "1", "gal")]);
        assert!(out.result.is_none());
        let error = out.rows[0].error.as_deref().unwrap();
        assert!(error.contains("no stationary fuel factor"));
    }

    #[test]
    fn one_bad_row_withholds_the_total_but_annotates_all() {
        let out = calculator().calculate(vec![
            StationaryRow::new("Kerosene", "1000", "gal"),
            StationaryRow::new("Kerosene", "", "gal"),
        ]);
        assert!(out.result.is_none());
        assert!(out.rows[0].co2e_t.is_some());
        assert!(out.rows[0].error.is_none());
        assert!(out.rows[1].error.is_some());
    }

    #[test]
    fn empty_row_set_is_a_zero_total() {
        let out = calculator().calculate(Vec::new());
        let result = out.result.unwrap();
        assert_eq!(result.total, CategoryTotal::Single { co2e_t: 0.0 });
    }
}
