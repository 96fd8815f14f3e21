//! Global warming potential weighting.
//!
//! The three-gas table weights CO2, CH4 and N2O masses into CO2-equivalent.
//! CO2's multiplier is structurally pinned to 1: the table only stores the
//! CH4 and N2O multipliers, so no dataset can ship a rescaled CO2.
//!
//! Refrigerants, fire-suppression agents and purchased industrial gases use
//! separate single-scalar GWP vocabularies owned by the factor catalog; the
//! same gas name deliberately carries different values across those maps.

use serde::{Deserialize, Serialize};

/// CH4 and N2O multipliers applied when weighting gas masses into CO2e.
///
/// Builtin values are the AR4 100-year horizon set (CH4 25, N2O 298), the
/// vintage the builtin factor tables were published against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpTable {
    pub ch4: f64,
    pub n2o: f64,
}

impl GwpTable {
    pub fn new(ch4: f64, n2o: f64) -> Self {
        Self { ch4, n2o }
    }

    pub fn ar4() -> Self {
        Self::new(25.0, 298.0)
    }

    /// CO2's multiplier. Always 1.
    pub fn co2(&self) -> f64 {
        1.0
    }

    /// Weight per-gas masses (kg) into CO2e kilograms.
    pub fn weigh_kg(&self, co2_kg: f64, ch4_kg: f64, n2o_kg: f64) -> f64 {
        co2_kg * self.co2() + ch4_kg * self.ch4 + n2o_kg * self.n2o
    }

    /// Weight per-gas masses (kg) into CO2e metric tons.
    pub fn co2e_tons(&self, co2_kg: f64, ch4_kg: f64, n2o_kg: f64) -> f64 {
        self.weigh_kg(co2_kg, ch4_kg, n2o_kg) / 1000.0
    }
}

impl Default for GwpTable {
    fn default() -> Self {
        Self::ar4()
    }
}
