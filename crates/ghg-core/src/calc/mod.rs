//! Category calculators.
//!
//! One module per emission category. Every calculator follows the same
//! protocol: it re-annotates each row (error set or cleared, computed CO2e
//! set or cleared) and yields a `CalcOutcome`. The category result is
//! present only when every row is clean; a single invalid row withholds
//! the total so partial numbers never escape.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::types::{CalcOutcome, Category, CategoryResult, CategoryTotal};

pub mod business_travel;
pub mod commuting;
pub mod electricity;
pub mod fire_suppression;
pub mod mobile;
pub mod offsets;
pub mod purchased_gases;
pub mod refrigeration;
pub mod stationary;
pub mod steam;
pub mod upstream;
pub mod waste;

pub use business_travel::{BusinessTravelCalculator, BusinessTravelRow};
pub use commuting::{CommutingCalculator, CommutingRow};
pub use electricity::{ElectricityCalculator, ElectricityRow};
pub use fire_suppression::{FireSuppressionCalculator, FireSuppressionMethod, FireSuppressionRow};
pub use mobile::{MobileCalculator, MobileRow, RoadStatus};
pub use offsets::{OffsetsCalculator, OffsetsRow};
pub use purchased_gases::{PurchasedGasesCalculator, PurchasedGasesRow};
pub use refrigeration::{RefrigerationCalculator, RefrigerationMethod, RefrigerationRow};
pub use stationary::{StationaryCalculator, StationaryRow};
pub use steam::{SteamCalculator, SteamRow};
pub use upstream::{UpstreamCalculator, UpstreamRow};
pub use waste::{WasteCalculator, WasteRow};

/// Row with the shared annotation slots.
pub(crate) trait Annotated {
    fn error(&self) -> Option<&str>;
}

pub(crate) fn all_clean<R: Annotated>(rows: &[R]) -> bool {
    rows.iter().all(|r| r.error().is_none())
}

/// Row array snapshot for the persisted payload.
pub(crate) fn snapshot<R: Serialize>(rows: &[R]) -> Value {
    serde_json::to_value(rows).unwrap_or(Value::Null)
}

/// Final step of every calculator: package the annotated rows, withholding
/// the category result when any row carries an error.
pub(crate) fn outcome<R: Serialize + Annotated>(
    category: Category,
    rows: Vec<R>,
    total: CategoryTotal,
    biogenic_co2_t: Option<f64>,
) -> CalcOutcome<R> {
    let result = if all_clean(&rows) {
        Some(CategoryResult {
            category,
            total,
            biogenic_co2_t,
            rows: snapshot(&rows),
        })
    } else {
        let invalid = rows.iter().filter(|r| r.error().is_some()).count();
        warn!(category = %category, invalid, "withholding category result");
        None
    };
    CalcOutcome { rows, result }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Probe {
        error: Option<String>,
    }

    impl Annotated for Probe {
        fn error(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    #[test]
    fn one_bad_row_withholds_the_result() {
        let rows = vec![
            Probe { error: None },
            Probe {
                error: Some("quantity is required".to_string()),
            },
        ];
        let out = outcome(
            Category::Waste,
            rows,
            CategoryTotal::Single { co2e_t: 1.0 },
            None,
        );
        assert!(out.result.is_none());
        assert_eq!(out.rows.len(), 2);
    }

    #[test]
    fn clean_rows_produce_a_result_with_snapshot() {
        let rows = vec![Probe { error: None }];
        let out = outcome(
            Category::Waste,
            rows,
            CategoryTotal::Single { co2e_t: 2.5 },
            None,
        );
        let result = out.result.unwrap();
        assert_eq!(result.category, Category::Waste);
        assert!(result.rows.is_array());
    }

    #[test]
    fn empty_row_set_is_clean() {
        let out = outcome::<Probe>(
            Category::Waste,
            Vec::new(),
            CategoryTotal::Single { co2e_t: 0.0 },
            None,
        );
        assert!(out.result.is_some());
    }
}
