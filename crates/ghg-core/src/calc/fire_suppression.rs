//! Fire suppression systems: fugitive agent releases. Scope 1.
//!
//! Shares the three-method family with refrigeration but the formulas
//! differ: the simplified balance nets recovered agent against charges
//! AND capacities, and screening works from equipment count times mass
//! released per unit, derated by recovery efficiency.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{optional_bounded, optional_non_negative, optional_signed, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireSuppressionMethod {
    #[serde(rename = "Material Balance Method")]
    MaterialBalance,
    #[serde(rename = "Simplified Material Balance Method")]
    SimplifiedMaterialBalance,
    #[serde(rename = "Screening Method")]
    Screening,
}

impl FireSuppressionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireSuppressionMethod::MaterialBalance => "Material Balance Method",
            FireSuppressionMethod::SimplifiedMaterialBalance => {
                "Simplified Material Balance Method"
            }
            FireSuppressionMethod::Screening => "Screening Method",
        }
    }
}

impl fmt::Display for FireSuppressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireSuppressionRow {
    pub agent: String,
    // Material balance, signed kg.
    #[serde(default)]
    pub inventory_change_kg: String,
    #[serde(default)]
    pub transferred_kg: String,
    #[serde(default)]
    pub capacity_change_kg: String,
    // Simplified material balance, kg.
    #[serde(default)]
    pub new_units_charge_kg: String,
    #[serde(default)]
    pub existing_units_recharge_kg: String,
    #[serde(default)]
    pub disposed_units_charge_kg: String,
    #[serde(default)]
    pub capacity_new_units_kg: String,
    #[serde(default)]
    pub capacity_existing_units_kg: String,
    #[serde(default)]
    pub capacity_disposed_units_kg: String,
    #[serde(default)]
    pub recovered_amount_kg: String,
    // Screening.
    /// Informational; fixed or portable.
    #[serde(default)]
    pub equipment_type: String,
    #[serde(default)]
    pub equipment_count: String,
    #[serde(default)]
    pub mass_released_kg: String,
    #[serde(default)]
    pub recovery_efficiency_pct: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FireSuppressionRow {
    pub fn for_agent(agent: &str) -> Self {
        Self {
            agent: agent.to_string(),
            inventory_change_kg: String::new(),
            transferred_kg: String::new(),
            capacity_change_kg: String::new(),
            new_units_charge_kg: String::new(),
            existing_units_recharge_kg: String::new(),
            disposed_units_charge_kg: String::new(),
            capacity_new_units_kg: String::new(),
            capacity_existing_units_kg: String::new(),
            capacity_disposed_units_kg: String::new(),
            recovered_amount_kg: String::new(),
            equipment_type: String::new(),
            equipment_count: String::new(),
            mass_released_kg: String::new(),
            recovery_efficiency_pct: String::new(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for FireSuppressionRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct FireSuppressionCalculator {
    data: Arc<ReferenceData>,
}

impl FireSuppressionCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(
        &self,
        method: FireSuppressionMethod,
        mut rows: Vec<FireSuppressionRow>,
    ) -> CalcOutcome<FireSuppressionRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(method, row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::FireSuppression,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, method: FireSuppressionMethod, row: &mut FireSuppressionRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let gwp = required_selector("agent", &row.agent, &mut errs)
            .and_then(|agent| match self.data.suppressants.resolve(agent) {
                Ok(v) => Some(v),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let mass_kg = match method {
            FireSuppressionMethod::MaterialBalance => {
                let inventory = optional_signed("inventory change", &row.inventory_change_kg, &mut errs);
                let transferred = optional_signed("transferred amount", &row.transferred_kg, &mut errs);
                let capacity = optional_signed("capacity change", &row.capacity_change_kg, &mut errs);
                match (inventory, transferred, capacity) {
                    (Some(a), Some(b), Some(c)) => Some(a + b + c),
                    _ => None,
                }
            }
            FireSuppressionMethod::SimplifiedMaterialBalance => {
                let charges = [
                    ("new units charge", &row.new_units_charge_kg),
                    ("existing units recharge", &row.existing_units_recharge_kg),
                    ("disposed units charge", &row.disposed_units_charge_kg),
                    ("capacity of new units", &row.capacity_new_units_kg),
                    ("capacity of existing units", &row.capacity_existing_units_kg),
                    ("capacity of disposed units", &row.capacity_disposed_units_kg),
                ];
                let mut sum = Some(0.0);
                for (field, raw) in charges {
                    sum = match (sum, optional_non_negative(field, raw, &mut errs)) {
                        (Some(acc), Some(v)) => Some(acc + v),
                        _ => None,
                    };
                }
                let recovered =
                    optional_non_negative("recovered amount", &row.recovered_amount_kg, &mut errs);
                match (sum, recovered) {
                    // Recovered can exceed the charges; the net may go negative.
                    (Some(sum), Some(recovered)) => Some(sum - recovered),
                    _ => None,
                }
            }
            FireSuppressionMethod::Screening => {
                let count = optional_non_negative("equipment count", &row.equipment_count, &mut errs);
                let released =
                    optional_non_negative("mass released", &row.mass_released_kg, &mut errs);
                let efficiency = optional_bounded(
                    "recovery efficiency",
                    &row.recovery_efficiency_pct,
                    0.0,
                    100.0,
                    0.0,
                    &mut errs,
                );
                match (count, released, efficiency) {
                    (Some(count), Some(released), Some(eff)) => {
                        Some(count * released * (1.0 - eff / 100.0))
                    }
                    _ => None,
                }
            }
        };

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (gwp, mass_kg) = (gwp?, mass_kg?);

        let co2e_t = mass_kg * gwp / 1000.0;
        row.co2e_t = Some(co2e_t);
        Some(co2e_t)
    }
}
