//! Upstream transportation and distribution of purchased goods. Scope 3.
//!
//! The activity quantity is interpreted per the mode's declared basis:
//! ton-miles for the freight modes, vehicle-miles for the truck fleet
//! factor. The resolved basis is echoed onto the row so reports can
//! label the column correctly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::{ReferenceData, TravelBasis};
use crate::row::{required_non_negative, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRow {
    pub mode: String,
    /// Ton-miles or vehicle-miles, per the mode's basis.
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<TravelBasis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpstreamRow {
    pub fn new(mode: &str, distance: &str) -> Self {
        Self {
            mode: mode.to_string(),
            distance: distance.to_string(),
            basis: None,
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for UpstreamRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct UpstreamCalculator {
    data: Arc<ReferenceData>,
}

impl UpstreamCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<UpstreamRow>) -> CalcOutcome<UpstreamRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::UpstreamTransportation,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, row: &mut UpstreamRow) -> Option<f64> {
        row.basis = None;
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let factor = required_selector("mode", &row.mode, &mut errs)
            .and_then(|mode| match self.data.upstream_transport.resolve(mode) {
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

        row.basis = Some(factor.basis);
        let co2e_t = distance * factor.co2e_kg_per_unit / 1000.0;
        row.co2e_t = Some(co2e_t);
        Some(co2e_t)
    }
}
