//! Purchased steam and district heat. Scope 2, dual accounting.
//!
//! Quantity converts to MMBtu, then grosses up by boiler efficiency
//! (delivered energy ÷ efficiency). The location side applies the
//! per-source t/MMBtu factor; the market side takes supplier kg/MMBtu
//! factors under the same all-three-or-none rule as electricity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::{outcome, Annotated};
use crate::catalog::ReferenceData;
use crate::row::{
    optional_bounded, required_non_negative, required_selector, FieldErrors,
};
use crate::types::{CalcOutcome, Category, CategoryTotal};
use crate::units::UnitClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamRow {
    pub source: String,
    pub quantity: String,
    pub unit: String,
    /// Percent in (0, 100]; empty means 100.
    #[serde(default)]
    pub boiler_efficiency_pct: String,
    /// Supplier-specific market factors, kg/MMBtu. All three or none.
    #[serde(default)]
    pub market_co2_kg_mmbtu: String,
    #[serde(default)]
    pub market_ch4_kg_mmbtu: String,
    #[serde(default)]
    pub market_n2o_kg_mmbtu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_co2e_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SteamRow {
    pub fn new(source: &str, quantity: &str, unit: &str) -> Self {
        Self {
            source: source.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            boiler_efficiency_pct: String::new(),
            market_co2_kg_mmbtu: String::new(),
            market_ch4_kg_mmbtu: String::new(),
            market_n2o_kg_mmbtu: String::new(),
            location_co2e_t: None,
            market_co2e_t: None,
            error: None,
        }
    }

    pub fn with_efficiency(mut self, pct: &str) -> Self {
        self.boiler_efficiency_pct = pct.to_string();
        self
    }

    pub fn with_market_factors(mut self, co2: &str, ch4: &str, n2o: &str) -> Self {
        self.market_co2_kg_mmbtu = co2.to_string();
        self.market_ch4_kg_mmbtu = ch4.to_string();
        self.market_n2o_kg_mmbtu = n2o.to_string();
        self
    }
}

impl Annotated for SteamRow {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct SteamCalculator {
    data: Arc<ReferenceData>,
}

impl SteamCalculator {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn calculate(&self, mut rows: Vec<SteamRow>) -> CalcOutcome<SteamRow> {
        let mut location = 0.0;
        let mut market = 0.0;
        for row in &mut rows {
            if let Some((loc_t, mkt_t)) = self.annotate(row) {
                location += loc_t;
                market += mkt_t;
            }
        }
        outcome(
            Category::Steam,
            rows,
            CategoryTotal::Dual {
                location_t: location,
                market_t: market,
            },
            None,
        )
    }

    fn annotate(&self, row: &mut SteamRow) -> Option<(f64, f64)> {
        row.location_co2e_t = None;
        row.market_co2e_t = None;
        row.error = None;
        let mut errs = FieldErrors::new();

        let factor_t = required_selector("source", &row.source, &mut errs)
            .and_then(|source| match self.data.steam.resolve(source) {
                Ok(f) => Some(f),
                Err(e) => {
                    errs.push(e.to_string());
                    None
                }
            });

        let unit = row.unit.trim();
        if !self.data.units.knows(unit, UnitClass::Energy) {
            errs.push(format!("unknown energy unit: {unit}"));
        }

        let qty = required_non_negative("quantity", &row.quantity, &mut errs);

        let efficiency = optional_bounded(
            "boiler efficiency",
            &row.boiler_efficiency_pct,
            0.0,
            100.0,
            100.0,
            &mut errs,
        );
        let efficiency = match efficiency {
            Some(v) if v == 0.0 => {
                errs.push("boiler efficiency must be greater than zero".to_string());
                None
            }
            other => other,
        };

        let market = self.parse_market_factors(row, &mut errs);

        if let Some(message) = errs.into_message() {
            row.error = Some(message);
            return None;
        }
        let (factor_t, qty, efficiency) = (factor_t?, qty?, efficiency?);

        let mmbtu = match self.data.units.convert(qty, unit, "MMBtu", UnitClass::Energy) {
            Ok(v) => v,
            Err(e) => {
                row.error = Some(e.to_string());
                return None;
            }
        };
        let effective = mmbtu / (efficiency / 100.0);

        let loc_t = effective * factor_t;
        let mkt_t = match market {
            Some([co2, ch4, n2o]) => {
                self.data
                    .gwp
                    .co2e_tons(effective * co2, effective * ch4, effective * n2o)
            }
            None => loc_t,
        };
        row.location_co2e_t = Some(loc_t);
        row.market_co2e_t = Some(mkt_t);
        Some((loc_t, mkt_t))
    }

    /// Supplier kg/MMBtu factors; None = fall back to the location side.
    fn parse_market_factors(&self, row: &SteamRow, errs: &mut FieldErrors) -> Option<[f64; 3]> {
        let fields = [
            ("market CO2 factor", &row.market_co2_kg_mmbtu),
            ("market CH4 factor", &row.market_ch4_kg_mmbtu),
            ("market N2O factor", &row.market_n2o_kg_mmbtu),
        ];
        let provided = fields.iter().filter(|(_, raw)| !raw.trim().is_empty()).count();
        match provided {
            0 => None,
            3 => {
                let co2 = required_non_negative(fields[0].0, fields[0].1, errs);
                let ch4 = required_non_negative(fields[1].0, fields[1].1, errs);
                let n2o = required_non_negative(fields[2].0, fields[2].1, errs);
                match (co2, ch4, n2o) {
                    (Some(co2), Some(ch4), Some(n2o)) => Some([co2, ch4, n2o]),
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
}
