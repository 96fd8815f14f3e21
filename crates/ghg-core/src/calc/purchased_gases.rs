//! Purchased industrial gases assumed fully released. Scope 1.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{required_non_negative, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};
use crate::units::UnitClass;

const ALLOWED_UNITS: &[&str] = &["lb", "kg"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedGasesRow {
    pub gas: String,
    pub quantity: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PurchasedGasesRow {
    pub fn new(gas: &str, quantity: &str, unit: &str) -> Self {
        Self {
            gas: gas.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for PurchasedGasesRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct PurchasedGasesCalculator {
    data: Arc<ReferenceData>,
}

impl PurchasedGasesCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<PurchasedGasesRow>) -> CalcOutcome<PurchasedGasesRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::PurchasedGases,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, row: &mut PurchasedGasesRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let factor = required_selector("gas", &row.gas, &mut errs)
            .and_then(|gas| match self.data.purchased_gases.resolve(gas) {
                Ok(v) => Some(v),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let unit = row.unit.trim();
        if !ALLOWED_UNITS.contains(&unit) {
            errs.push(format!("unit must be one of: {}", ALLOWED_UNITS.join(", ")));
        }
        let quantity = required_non_negative("quantity", &row.quantity, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (factor, quantity) = (factor?, quantity?);

        let lb_qty = match self.data.units.convert(quantity, unit, "lb", UnitClass::Mass) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        debug!(gas = %row.gas, lb_qty, "resolved purchased gas");
        let co2e_lb = lb_qty * factor.co2e_per_lb;
        let co2e_t = match self
            .data
            .units
            .convert(co2e_lb, "lb", "metric ton", UnitClass::Mass)
        {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        row.co2e_t = Some(co2e_t);
        Some(co2e_t)
    }
}
