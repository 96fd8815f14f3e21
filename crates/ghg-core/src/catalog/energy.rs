//! Purchased energy factors: grid electricity and district steam.
//!
//! Grid factors are kept in their published scale, pounds per MWh, and
//! converted to kg through the mass table at calculation time. Steam
//! factors are already metric tons CO2e per MMBtu.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FactorError;

/// Per-subregion grid intensity, lb per MWh for each gas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridFactor {
    pub co2_lb_mwh: f64,
    pub ch4_lb_mwh: f64,
    pub n2o_lb_mwh: f64,
}

/// eGRID subregion name → grid factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFactors {
    regions: HashMap<String, GridFactor>,
}

impl GridFactors {
    pub fn builtin() -> Self {
        let mut regions = HashMap::new();
        let mut add = |name: &str, co2: f64, ch4: f64, n2o: f64| {
            regions.insert(
                name.to_string(),
                GridFactor {
                    co2_lb_mwh: co2,
                    ch4_lb_mwh: ch4,
                    n2o_lb_mwh: n2o,
                },
            );
        };

        add("ASCC Alaska Grid", 1065.8, 0.091, 0.012);
        add("ASCC Miscellaneous", 1491.6, 0.118, 0.016);
        add("ERCOT All", 771.1, 0.056, 0.008);
        add("FRCC All", 813.9, 0.053, 0.007);
        add("HICC Miscellaneous", 1155.486, 0.124, 0.019);
        add("HICC Oahu", 1575.1, 0.167, 0.025);
        add("MRO East", 1425.5, 0.131, 0.019);
        add("MRO West", 934.4, 0.099, 0.014);
        add("NPCC New England", 529.3, 0.064, 0.008);
        add("NPCC Long Island", 1200.7, 0.123, 0.016);
        add("NPCC NYCWestchester", 829.5, 0.026, 0.003);
        add("NPCC Upstate NY", 263.3, 0.016, 0.002);
        add("Puerto Rico Miscellaneous", 1593.5, 0.144, 0.021);
        add("RFC East", 655.4, 0.049, 0.007);
        add("RFC Michigan", 1185.0, 0.108, 0.015);
        add("RFC West", 1067.9, 0.093, 0.013);
        add("SERC Mississippi Valley", 791.6, 0.050, 0.007);
        add("SERC Midwest", 1425.4, 0.135, 0.019);
        add("SERC South", 880.7, 0.063, 0.009);
        add("SERC Tennessee Valley", 935.8, 0.077, 0.011);
        add("SERC Virginia/Carolina", 624.6, 0.051, 0.007);
        add("SPP North", 1179.6, 0.119, 0.017);
        add("SPP South", 1002.9, 0.083, 0.012);
        add("WECC California", 497.7, 0.033, 0.004);
        add("WECC Northwest", 600.9, 0.050, 0.007);
        add("WECC Rockies", 1102.4, 0.095, 0.013);
        add("WECC Southwest", 820.2, 0.062, 0.009);
        add("US Average", 852.3, 0.066, 0.009);

        Self { regions }
    }

    pub fn resolve(&self, region: &str) -> Result<GridFactor, FactorError> {
        self.regions
            .get(region)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: "grid region",
                selector: region.to_string(),
            })
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Steam / district heat source → metric tons CO2e per MMBtu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamFactors {
    sources: HashMap<String, f64>,
}

impl SteamFactors {
    pub fn builtin() -> Self {
        let mut sources = HashMap::new();
        sources.insert("District Steam".to_string(), 0.053);
        sources.insert("District Hot Water".to_string(), 0.045);
        Self { sources }
    }

    pub fn resolve(&self, source: &str) -> Result<f64, FactorError> {
        self.sources
            .get(source)
            .copied()
            .ok_or_else(|| FactorError::NotFound {
                table: "steam source",
                selector: source.to_string(),
            })
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
