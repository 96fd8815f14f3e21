//! Purchased electricity. Scope 2, dual accounting.
//!
//! The location-based side always uses the grid subregion factors. The
//! market-based side uses row-level supplier factors (lb/MWh) when all
//! three gases are provided; with none provided it falls back to the
//! location factors. A partially filled set is a row error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::{outcome, Annotated};
use crate::catalog::{GridFactor, ReferenceData};
use crate::row::{required_non_negative, required_positive, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};
use crate::units::UnitClass;

const ALLOWED_UNITS: &[&str] = &["kWh", "MWh"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityRow {
    pub region: String,
    pub quantity: String,
    pub unit: String,
    /// Supplier-specific market factors, lb/MWh. All three or none.
    #[serde(default)]
    pub market_co2_lb_mwh: String,
    #[serde(default)]
    pub market_ch4_lb_mwh: String,
    #[serde(default)]
    pub market_n2o_lb_mwh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ElectricityRow {
    pub fn new(region: &str, quantity: &str, unit: &str) -> Self {
        Self {
            region: region.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            market_co2_lb_mwh: String::new(),
            market_ch4_lb_mwh: String::new(),
            market_n2o_lb_mwh: String::new(),
            location_co2e_t: None,
            market_co2e_t: None,
            error: None,
        }
    }

    pub fn with_market_factors(mut self, co2: &str, ch4: &str, n2o: &str) -> Self {
        self.market_co2_lb_mwh = co2.to_string();
        self.market_ch4_lb_mwh = ch4.to_string();
        self.market_n2o_lb_mwh = n2o.to_string();
        self
    }
}

impl Annotated for ElectricityRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct ElectricityCalculator {
    data: Arc<ReferenceData>,
}

impl ElectricityCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<ElectricityRow>) -> CalcOutcome<ElectricityRow> {
        let mut location = 0.0;
        let mut market = 0.0;
        for row in &mut rows {
            if let Some((loc_t, mkt_t)) = self.annotate(row) {
                location += loc_t;
                market += mkt_t;
            }
        }
        outcome(
            Category::Electricity,
            rows,
            CategoryTotal::Dual {
                location_t: location,
                market_t: market,
            },
            None,
        )
    }

    fn annotate(&self, row: &mut ElectricityRow) -> Option<(f64, f64)> {
        row.location_co2e_t = None;
        row.market_co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let grid = required_selector("region", &row.region, &mut errs)
            .and_then(|region| match self.data.grid.resolve(region) {
                Ok(g) => Some(g),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let unit = row.unit.trim();
        if !ALLOWED_UNITS.contains(&unit) {
            errs.push(format!("unit must be one of: {}", ALLOWED_UNITS.join(", ")));
        }

        let qty = required_positive("quantity", &row.quantity, &mut errs);
        let market = self.parse_market_factors(row, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (grid, qty) = (grid?, qty?);

        let mwh = match self.data.units.convert(qty, unit, "MWh", UnitClass::Energy) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        debug!(region = %row.region.trim(), mwh, "resolved grid factors");

        let loc_t = self.co2e_from_lb_mwh(grid, mwh)?;
        let mkt_t = match market {
            Some(custom) => self.co2e_from_lb_mwh(custom, mwh)?,
            None => loc_t,
        };
        row.location_co2e_t = Some(loc_t);
        row.market_co2e_t = Some(mkt_t);
        Some((loc_t, mkt_t))
    }

    /// None = fall back to location factors. All-or-nothing: one or two
    /// provided fields is a row error.
    fn parse_market_factors(
        &self,
        row: &ElectricityRow,
        errs: &mut FieldErrors,
    ) -> Option<GridFactor> {
        let fields = [
            ("market CO2 factor", &row.market_co2_lb_mwh),
            ("market CH4 factor", &row.market_ch4_lb_mwh),
            ("market N2O factor", &row.market_n2o_lb_mwh),
        ];
        let provided = fields.iter().filter(|(_, raw)| !raw.trim().is_empty()).count();
        match provided {
            0 => None,
            3 => {
                let co2 = required_non_negative(fields[0].0, fields[0].1, errs);
                let ch4 = required_non_negative(fields[1].0, fields[1].1, errs);
                let n2o = required_non_negative(fields[2].0, fields[2].1, errs);
                match (co2, ch4, n2o) {
                    (Some(co2), Some(ch4), Some(n2o)) => Some(GridFactor {
                        co2_lb_mwh: co2,
                        ch4_lb_mwh: ch4,
                        n2o_lb_mwh: n2o,
                    }),
                    _ => None,
                }
            }
            _ => {
                errs.push(
                    "market factors must be provided together (CO2, CH4, N2O) or all left empty"
                        .to_string(),
                );
                None
            }
        }
    }

    /// lb/MWh factors × MWh, through the mass table, to CO2e tons.
    fn co2e_from_lb_mwh(&self, factor: GridFactor, mwh: f64) -> Option<f64> {
        let to_kg = |lb: f64| self.data.units.convert(lb, "lb", "kg", UnitClass::Mass).ok();
        let co2_kg = to_kg(factor.co2_lb_mwh * mwh)?;
        let ch4_kg = to_kg(factor.ch4_lb_mwh * mwh)?;
        let n2o_kg = to_kg(factor.n2o_lb_mwh * mwh)?;
        Some(self.data.gwp.co2e_tons(co2_kg, ch4_kg, n2o_kg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> ElectricityCalculator {
        ElectricityCalculator::new(ReferenceData::builtin_shared())
    }

    const LB_TO_KG: f64 = 0.453592;

    fn co2e_t(co2_lb: f64, ch4_lb: f64, n2o_lb: f64) -> f64 {
        (co2_lb * LB_TO_KG + ch4_lb * LB_TO_KG * 25.0 + n2o_lb * LB_TO_KG * 298.0) / 1000.0
    }

    #[test]
    fn location_side_uses_the_region_factors() {
        let out = calculator().calculate(vec![ElectricityRow::new(
            "HICC Miscellaneous",
            "1000",
            "MWh",
        )]);
        let result = out.result.unwrap();
        let expected = co2e_t(1155.486 * 1000.0, 0.124 * 1000.0, 0.019 * 1000.0);
        let CategoryTotal::Dual { location_t, market_t } = result.total else {
            panic!("electricity total is dual");
        };
        assert!((location_t - expected).abs() < 1e-9);
        // No custom factors: market side mirrors location.
        assert!((market_t - location_t).abs() < 1e-12);
    }

    #[test]
    fn kwh_and_mwh_agree() {
        let a = calculator().calculate(vec![ElectricityRow::new("US Average", "1000", "kWh")]);
        let b = calculator().calculate(vec![ElectricityRow::new("US Average", "1", "MWh")]);
        let a_t = a.rows[0].location_co2e_t.unwrap();
        let b_t = b.rows[0].location_co2e_t.unwrap();
        assert!((a_t - b_t).abs() < 1e-9);
    }

    #[test]
    fn custom_market_factors_diverge_from_location() {
        let row = ElectricityRow::new("WECC California", "100", "MWh")
            .with_market_factors("500", "0.02", "0.003");
        let out = calculator().calculate(vec![row]);
        let row = &out.rows[0];
        let expected_market = co2e_t(500.0 * 100.0, 0.02 * 100.0, 0.003 * 100.0);
        assert!((row.market_co2e_t.unwrap() - expected_market).abs() < 1e-9);
        assert!(row.market_co2e_t.unwrap() != row.location_co2e_t.unwrap());
    }

    #[test]
    fn partial_market_factors_are_rejected() {
        let row = ElectricityRow::new("US Average", "100", "MWh").with_market_factors("500", "", "");
        let out = calculator().calculate(vec![row]);
        assert!(out.result.is_none());
        let error = out.rows[0].error.as_deref().unwrap();
        assert!(error.contains("provided together"));
    }

    #[test]
    fn unknown_region_is_a_row_error_not_a_zero() {
        let out = calculator().calculate(vec![ElectricityRow::new("WECC Atlantis", "100", "MWh")]);
        assert!(out.result.is_none());
        assert!(out.rows[0]
            .error
            .as_deref()
            .unwrap()
            .contains("no grid region factor"));
    }

    #[test]
    fn negative_custom_factor_is_reported_with_the_field_name() {
        let row = ElectricityRow::new("US Average", "100", "MWh")
            .with_market_factors("500", "-1", "0.003");
        let out = calculator().calculate(vec![row]);
        let error = out.rows[0].error.as_deref().unwrap();
        assert!(error.contains("market CH4 factor must not be negative"));
    }
}
