//! Employee business travel by mode. Scope 3.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{required_non_negative, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessTravelRow {
    pub mode: String,
    /// Passenger-miles for every builtin mode.
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BusinessTravelRow {
    pub fn new(mode: &str, distance: &str) -> Self {
        Self {
            mode: mode.to_string(),
            distance: distance.to_string(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for BusinessTravelRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct BusinessTravelCalculator {
    data: Arc<ReferenceData>,
}

impl BusinessTravelCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<BusinessTravelRow>) -> CalcOutcome<BusinessTravelRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::BusinessTravel,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, row: &mut BusinessTravelRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let factor = required_selector("mode", &row.mode, &mut errs)
            .and_then(|mode| match self.data.business_travel.resolve(mode) {
                Ok(v) => Some(v),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });
        let distance = required_non_negative("distance", &row.distance, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (factor, distance) = (factor?, distance?);

        let co2e_t = distance * factor.co2e_kg_per_unit / 1000.0;
        row.co2e_t = Some(co2e_t);
        Some(co2e_t)
    }
}
