//! Purchased offset instruments, recorded against a scope bucket.
//!
//! Amounts are entered as positive CO2e metric tons. Rows are annotated
//! with the signed (negative) contribution; the committed total keeps the
//! per-bucket magnitudes positive and leaves subtraction to the summary
//! aggregation, which also decides how negative nets are displayed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{required_non_negative, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal, OffsetTotals, ScopeBucket};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetsRow {
    pub instrument: String,
    pub bucket: ScopeBucket,
    /// CO2e metric tons retired, entered positive.
    pub amount_t: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OffsetsRow {
    pub fn new(instrument: &str, bucket: ScopeBucket, amount_t: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            bucket,
            amount_t: amount_t.to_string(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for OffsetsRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct OffsetsCalculator {
    data: Arc<ReferenceData>,
}

impl OffsetsCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<OffsetsRow>) -> CalcOutcome<OffsetsRow> {
        let mut totals = OffsetTotals::default();
        for row in &mut rows {
            if let Some(amount_t) = self.annotate(row) {
                let slot = match row.bucket {
                    ScopeBucket::Scope1 => &mut totals.scope1_t,
                    ScopeBucket::Scope2Location => &mut totals.scope2_location_t,
                    ScopeBucket::Scope2Market => &mut totals.scope2_market_t,
                    ScopeBucket::Scope3 => &mut totals.scope3_t,
                };
                *slot += amount_t;
            }
        }
        outcome(
            Category::Offsets,
            rows,
            CategoryTotal::Offsets(totals),
            None,
        )
    }

    fn annotate(&self, row: &mut OffsetsRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let sign = required_selector("instrument", &row.instrument, &mut errs)
            .and_then(
                |instrument| match self.data.offsets.resolve(instrument) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        errs.push(e.to_string());
                        None
                    }
                },
            );
        let amount_t = required_non_negative("amount", &row.amount_t, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (sign, amount_t) = (sign?, amount_t?);

        // Instrument factors are -1; the row shows the signed contribution.
        row.co2e_t = Some(sign * amount_t);
        Some(amount_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> OffsetsCalculator {
        OffsetsCalculator::new(ReferenceData::builtin_shared())
    }

    #[test]
    fn amounts_land_in_their_bucket() {
        let rows = vec![
            OffsetsRow::new("Carbon Offsets", ScopeBucket::Scope1, "150"),
            OffsetsRow::new("Renewable Energy Credits", ScopeBucket::Scope2Market, "40"),
            OffsetsRow::new("Carbon Offsets", ScopeBucket::Scope1, "25"),
        ];
        let out = calculator().calculate(rows);
        match out.result.unwrap().total {
            CategoryTotal::Offsets(totals) => {
                assert!((totals.scope1_t - 175.0).abs() < 1e-12);
                assert!((totals.scope2_market_t - 40.0).abs() < 1e-12);
                assert_eq!(totals.scope2_location_t, 0.0);
                assert_eq!(totals.scope3_t, 0.0);
            }
            other => panic!("expected offsets total, got {other:?}"),
        }
    }

    #[test]
    fn rows_carry_the_signed_contribution() {
        let row = OffsetsRow::new("Carbon Offsets", ScopeBucket::Scope3, "12.5");
        let out = calculator().calculate(vec![row]);
        assert_eq!(out.rows[0].co2e_t, Some(-12.5));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let row = OffsetsRow::new("Carbon Offsets", ScopeBucket::Scope1, "-5");
        let out = calculator().calculate(vec![row]);
        assert_eq!(
            out.rows[0].error.as_deref(),
            Some("amount must not be negative")
        );
        assert!(out.result.is_none());
    }

    #[test]
    fn unknown_instrument_is_a_row_error() {
        let row = OffsetsRow::new("Tree Planting Pledge", ScopeBucket::Scope1, "5");
        let out = calculator().calculate(vec![row]);
        assert!(out.rows[0]
            .error
            .as_deref()
            .unwrap()
            .contains("no offset instrument factor"));
    }

    #[test]
    fn empty_set_commits_zero_magnitudes() {
        let out = calculator().calculate(Vec::new());
        match out.result.unwrap().total {
            CategoryTotal::Offsets(totals) => assert_eq!(totals, OffsetTotals::default()),
            other => panic!("expected offsets total, got {other:?}"),
        }
    }
}
