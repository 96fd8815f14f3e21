//! Refrigeration and air conditioning: fugitive refrigerant releases.
//! Scope 1.
//!
//! One accounting method applies to the whole calculation. Only the
//! fields the active method reads are validated; the others ride along
//! untouched. Material-balance deltas are signed kilograms, so a net
//! recovery can drive the category negative.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{optional_bounded, optional_non_negative, optional_signed, required_selector, FieldErrors};
use crate::types::{CalcOutcome, Category, CategoryTotal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefrigerationMethod {
    #[serde(rename = "Material Balance Method")]
    MaterialBalance,
    #[serde(rename = "Simplified Material Balance Method")]
    SimplifiedMaterialBalance,
    #[serde(rename = "Screening Method")]
    Screening,
}

impl RefrigerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefrigerationMethod::MaterialBalance => "Material Balance Method",
            RefrigerationMethod::SimplifiedMaterialBalance => "Simplified Material Balance Method",
            RefrigerationMethod::Screening => "Screening Method",
        }
    }
}

impl fmt::Display for RefrigerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefrigerationRow {
    /// Informational; not a factor selector.
    #[serde(default)]
    pub equipment_type: String,
    pub gas: String,
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
    pub serviced_units_charge_kg: String,
    #[serde(default)]
    pub disposed_units_charge_kg: String,
    // Screening.
    #[serde(default)]
    pub operating_capacity_kg: String,
    #[serde(default)]
    pub months_in_operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefrigerationRow {
    pub fn for_gas(gas: &str) -> Self {
        Self {
            equipment_type: String::new(),
            gas: gas.to_string(),
            inventory_change_kg: String::new(),
            transferred_kg: String::new(),
            capacity_change_kg: String::new(),
            new_units_charge_kg: String::new(),
            serviced_units_charge_kg: String::new(),
            disposed_units_charge_kg: String::new(),
            operating_capacity_kg: String::new(),
            months_in_operation: String::new(),
            co2e_t: None,
            error: None,
        }
    }
}

impl Annotated for RefrigerationRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct RefrigerationCalculator {
    data: Arc<ReferenceData>,
}

impl RefrigerationCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(
        &self,
        method: RefrigerationMethod,
        mut rows: Vec<RefrigerationRow>,
    ) -> CalcOutcome<RefrigerationRow> {
        let mut total = 0.0;
        for row in &mut rows {
            if let Some(co2e_t) = self.annotate(method, row) {
                total += co2e_t;
            }
        }
        outcome(
            Category::RefrigerationAc,
            rows,
            CategoryTotal::Single { co2e_t: total },
            None,
        )
    }

    fn annotate(&self, method: RefrigerationMethod, row: &mut RefrigerationRow) -> Option<f64> {
        row.co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let gwp = required_selector("gas", &row.gas, &mut errs)
            .and_then(|gas| match self.data.refrigerants.resolve(gas) {
                Ok(v) => Some(v),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let mass_kg = match method {
            RefrigerationMethod::MaterialBalance => {
                let inventory = optional_signed("inventory change", &row.inventory_change_kg, &mut errs);
                let transferred = optional_signed("transferred amount", &row.transferred_kg, &mut errs);
                let capacity = optional_signed("capacity change", &row.capacity_change_kg, &mut errs);
                match (inventory, transferred, capacity) {
                    (Some(a), Some(b), Some(c)) => Some(a + b + c),
                    _ => None,
                }
            }
            RefrigerationMethod::SimplifiedMaterialBalance => {
                let new = optional_non_negative("new units charge", &row.new_units_charge_kg, &mut errs);
                let serviced =
                    optional_non_negative("serviced units charge", &row.serviced_units_charge_kg, &mut errs);
                let disposed =
                    optional_non_negative("disposed units charge", &row.disposed_units_charge_kg, &mut errs);
                match (new, serviced, disposed) {
                    (Some(a), Some(b), Some(c)) => Some(a + b + c),
                    _ => None,
                }
            }
            RefrigerationMethod::Screening => {
                let capacity =
                    optional_non_negative("operating capacity", &row.operating_capacity_kg, &mut errs);
                let months = optional_bounded(
                    "months in operation",
                    &row.months_in_operation,
                    0.0,
                    12.0,
                    0.0,
                    &mut errs,
                );
                match (capacity, months) {
                    (Some(capacity), Some(months)) => Some(capacity * months / 12.0),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> RefrigerationCalculator {
        RefrigerationCalculator::new(ReferenceData::builtin_shared())
    }

    #[test]
    fn material_balance_sums_signed_deltas() {
        let mut row = RefrigerationRow::for_gas("HFC-134a");
        row.inventory_change_kg = "10".to_string();
        row.transferred_kg = "-4".to_string();
        row.capacity_change_kg = "2".to_string();
        let out = calculator().calculate(RefrigerationMethod::MaterialBalance, vec![row]);
        // 8 kg x 1300 / 1000
        assert!((out.rows[0].co2e_t.unwrap() - 10.4).abs() < 1e-9);
    }

    #[test]
    fn net_recovery_goes_negative() {
        let mut row = RefrigerationRow::for_gas("HFC-134a");
        row.inventory_change_kg = "-5".to_string();
        let out = calculator().calculate(RefrigerationMethod::MaterialBalance, vec![row]);
        let result = out.result.unwrap();
        let CategoryTotal::Single { co2e_t } = result.total else {
            panic!("refrigeration total is single-valued");
        };
        assert!((co2e_t + 6.5).abs() < 1e-9);
    }

    #[test]
    fn simplified_material_balance_sums_charges() {
        let mut row = RefrigerationRow::for_gas("HFC-32");
        row.new_units_charge_kg = "5".to_string();
        row.serviced_units_charge_kg = "3".to_string();
        row.disposed_units_charge_kg = "2".to_string();
        let out = calculator().calculate(RefrigerationMethod::SimplifiedMaterialBalance, vec![row]);
        // 10 kg x 677 / 1000
        assert!((out.rows[0].co2e_t.unwrap() - 6.77).abs() < 1e-9);
    }

    #[test]
    fn screening_prorates_by_months() {
        let mut row = RefrigerationRow::for_gas("CO2");
        row.operating_capacity_kg = "100".to_string();
        row.months_in_operation = "6".to_string();
        let out = calculator().calculate(RefrigerationMethod::Screening, vec![row]);
        // 100 x 6/12 = 50 kg x GWP 1 / 1000
        assert!((out.rows[0].co2e_t.unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn months_outside_the_year_are_rejected() {
        let mut row = RefrigerationRow::for_gas("CO2");
        row.operating_capacity_kg = "100".to_string();
        row.months_in_operation = "13".to_string();
        let out = calculator().calculate(RefrigerationMethod::Screening, vec![row]);
        assert!(out.rows[0]
            .error
            .as_deref()
            .unwrap()
            .contains("months in operation must be between 0 and 12"));
    }

    #[test]
    fn only_the_active_methods_fields_are_validated() {
        let mut row = RefrigerationRow::for_gas("HFC-125");
        row.inventory_change_kg = "1".to_string();
        // Junk in a screening-only field is ignored under material balance.
        row.operating_capacity_kg = "not a number".to_string();
        let out = calculator().calculate(RefrigerationMethod::MaterialBalance, vec![row]);
        assert!(out.result.is_some());
        assert!(out.rows[0].error.is_none());
    }

    #[test]
    fn simplified_charges_must_not_be_negative() {
        let mut row = RefrigerationRow::for_gas("HFC-125");
        row.new_units_charge_kg = "-1".to_string();
        let out = calculator().calculate(RefrigerationMethod::SimplifiedMaterialBalance, vec![row]);
        assert!(out.rows[0]
            .error
            .as_deref()
            .unwrap()
            .contains("new units charge must not be negative"));
    }

    #[test]
    fn suppression_only_agents_are_rejected() {
        let mut row = RefrigerationRow::for_gas("Halon 1301");
        row.inventory_change_kg = "1".to_string();
        let out = calculator().calculate(RefrigerationMethod::MaterialBalance, vec![row]);
        assert!(out.rows[0]
            .error
            .as_deref()
            .unwrap()
            .contains("no refrigerant factor"));
    }
}
