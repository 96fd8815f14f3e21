//! Gas vocabularies for refrigeration, fire suppression, and purchased
//! industrial gases.
//!
//! These are three separate tables with overlapping names and different
//! values for the same name (HFC-227ea is 3220 as a refrigerant and 3350
//! as a suppressant). They stay separate; a row only resolves against the
//! vocabulary of its own category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FactorError;

/// Named-gas → GWP map with the table name baked in for error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasGwp {
    /// Not serialized; loaders restore it through `relabel`.
    #[serde(skip)]
    table: &'static str,
    gases: HashMap<String, f64>,
}

impl GasGwp {
    fn from_pairs(table: &'static str, pairs: &[(&str, f64)]) -> Self {
        Self {
            table,
            gases: pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        }
    }

    /// Restores the vocabulary name on a deserialized table.
    pub(crate) fn relabel(&mut self, table: &'static str) {
        self.table = table;
    }

    pub fn refrigerants() -> Self {
        Self::from_pairs(
            "refrigerant",
            &[
                ("HFC-32", 677.0),
                ("HFC-125", 3170.0),
                ("HFC-134a", 1300.0),
                ("HFC-143a", 4470.0),
                ("HFC-152a", 124.0),
                ("HFC-227ea", 3220.0),
                ("HFC-236fa", 9810.0),
                ("PFC-CF4", 7390.0),
                ("PFC-C2F6", 12200.0),
                ("PFC-C3F8", 8840.0),
                ("SF6", 23500.0),
                ("CO2", 1.0),
            ],
        )
    }

    pub fn suppressants() -> Self {
        Self::from_pairs(
            "fire suppressant",
            &[
                ("CO2", 1.0),
                ("HFC-23", 12400.0),
                ("HFC-125", 3170.0),
                ("HFC-134a", 1300.0),
                ("HFC-227ea", 3350.0),
                ("HFC-236fa", 8060.0),
                ("PFC-14", 6630.0),
                ("PFC-31-10", 9200.0),
                ("Halon 1301", 7140.0),
                ("Halon 1211", 1890.0),
            ],
        )
    }

    pub fn resolve(&self, gas: &str) -> Result<f64, FactorError> {
        self.gases
            .get(gas)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: self.table,
                selector: gas.to_string(),
            })
    }

    pub fn gas_names(&self) -> impl Iterator<Item = &str> {
        self.gases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.gases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gases.is_empty()
    }
}

/// Purchased industrial gas: CO2e multiplier per pound of gas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurchasedGasFactor {
    pub co2e_per_lb: f64,
}

/// Purchased-gas name → per-lb multiplier. Row masses arrive in lb or kg
/// and are converted to the lb base through the mass table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedGasFactors {
    gases: HashMap<String, PurchasedGasFactor>,
}

impl PurchasedGasFactors {
    pub fn builtin() -> Self {
        let pairs: &[(&str, f64)] = &[
            ("Carbon dioxide (CO2)", 1.0),
            ("Methane (CH4)", 25.0),
            ("Nitrous oxide (N2O)", 298.0),
            ("HFC-23", 12400.0),
            ("HFC-125", 3170.0),
            ("HFC-134a", 1300.0),
            ("HFC-227ea", 3350.0),
            ("HFC-236fa", 8060.0),
            ("PFC-14", 6630.0),
            ("PFC-31-10", 9200.0),
            ("Sulfur hexafluoride (SF6)", 23500.0),
            ("Nitrogen trifluoride (NF3)", 17300.0),
        ];
        Self {
            gases: pairs
                .iter()
                .map(|(n, v)| (n.to_string(), PurchasedGasFactor { co2e_per_lb: *v }))
                .collect(),
        }
    }

    pub fn resolve(&self, gas: &str) -> Result<PurchasedGasFactor, FactorError> {
        self.gases
            .get(gas)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: "purchased gas",
                selector: gas.to_string(),
            })
    }

    pub fn gas_names(&self) -> impl Iterator<Item = &str> {
        self.gases.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_disagree_on_shared_names() {
        let refrigerants = GasGwp::refrigerants();
        let suppressants = GasGwp::suppressants();
        assert!((refrigerants.resolve("HFC-227ea").unwrap() - 3220.0).abs() < 1e-9);
        assert!((suppressants.resolve("HFC-227ea").unwrap() - 3350.0).abs() < 1e-9);
        assert!((refrigerants.resolve("HFC-236fa").unwrap() - 9810.0).abs() < 1e-9);
        assert!((suppressants.resolve("HFC-236fa").unwrap() - 8060.0).abs() < 1e-9);
    }

    #[test]
    fn each_vocabulary_rejects_the_others_gases() {
        // Halon is suppression-only, HFC-32 is refrigeration-only.
        assert!(GasGwp::refrigerants().resolve("Halon 1301").is_err());
        assert!(GasGwp::suppressants().resolve("HFC-32").is_err());
    }

    #[test]
    fn error_names_the_vocabulary() {
        let err = GasGwp::suppressants().resolve("HFC-32").unwrap_err();
        assert_eq!(err.to_string(), "no fire suppressant factor for selector 'HFC-32'");
    }

    #[test]
    fn purchased_gases_carry_per_lb_multipliers() {
        let table = PurchasedGasFactors::builtin();
        assert!((table.resolve("Methane (CH4)").unwrap().co2e_per_lb - 25.0).abs() < 1e-9);
        assert!(
            (table.resolve("Nitrogen trifluoride (NF3)").unwrap().co2e_per_lb - 17300.0).abs()
                < 1e-9
        );
        assert!(table.resolve("Argon").is_err());
    }

    #[test]
    fn vocabulary_sizes_match_the_published_tables() {
        assert_eq!(GasGwp::refrigerants().len(), 12);
        assert_eq!(GasGwp::suppressants().len(), 10);
    }
}
