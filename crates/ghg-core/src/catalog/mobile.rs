//! Mobile source factors.
//!
//! On-road vehicles burn a named road fuel (CO2 kg per 1000 fuel units) and
//! add CH4/N2O per mile from model-year brackets. Non-road equipment only
//! has per-gallon CO2, resolved from a vehicle/fuel table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FactorError;

/// Inclusive model-year range with its per-mile gas factors in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBracket {
    pub from: u16,
    pub to: u16,
    pub ch4_g_mi: f64,
    pub n2o_g_mi: f64,
}

impl YearBracket {
    fn new(from: u16, to: u16, ch4_g_mi: f64, n2o_g_mi: f64) -> Self {
        Self {
            from,
            to,
            ch4_g_mi,
            n2o_g_mi,
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

/// On-road vehicle class: the road fuel it burns plus its year brackets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnRoadVehicle {
    pub fuel: String,
    pub brackets: Vec<YearBracket>,
}

impl OnRoadVehicle {
    /// Bracket covering `year`, or None when the year falls outside every
    /// range. Callers treat a miss as zero CH4/N2O, not as an error.
    pub fn bracket_for(&self, year: u16) -> Option<&YearBracket> {
        self.brackets.iter().find(|b| year >= b.from && year <= b.to)
    }
}

/// CO2 factor for a road fuel, kg per 1000 declared units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadFuel {
    pub co2_kg_per_1000: f64,
    /// Unit the factor is declared against ("gal" or "scf").
    pub unit: String,
    #[serde(default)]
    pub biogenic: bool,
}

impl RoadFuel {
    fn gallons(co2_kg_per_1000: f64) -> Self {
        Self {
            co2_kg_per_1000,
            unit: "gal".to_string(),
            biogenic: false,
        }
    }

    fn biomass(mut self) -> Self {
        self.biogenic = true;
        self
    }
}

/// Full mobile-source factor set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileFactors {
    on_road: HashMap<String, OnRoadVehicle>,
    road_fuels: HashMap<String, RoadFuel>,
    /// vehicle → fuel → CO2 kg per 1000 gallons.
    off_road: HashMap<String, HashMap<String, f64>>,
}

impl MobileFactors {
    pub fn builtin() -> Self {
        let mut on_road = HashMap::new();
        let mut vehicle = |name: &str, fuel: &str, brackets: Vec<YearBracket>| {
            on_road.insert(
                name.to_string(),
                OnRoadVehicle {
                    fuel: fuel.to_string(),
                    brackets,
                },
            );
        };

        vehicle(
            "Passenger Cars - Gasoline",
            "Motor Gasoline",
            vec![
                YearBracket::new(1984, 1993, 0.15, 0.08),
                YearBracket::new(1994, 1997, 0.10, 0.06),
                YearBracket::new(1998, 2000, 0.09, 0.08),
                YearBracket::new(2001, 2003, 0.09, 0.06),
                YearBracket::new(2004, 2005, 0.09, 0.05),
                YearBracket::new(2006, 2016, 0.07, 0.04),
                YearBracket::new(2017, 2024, 0.04, 0.03),
            ],
        );
        vehicle(
            "Light Duty Trucks - Gasoline",
            "Motor Gasoline",
            vec![
                YearBracket::new(1987, 1993, 0.23, 0.12),
                YearBracket::new(1994, 1999, 0.14, 0.09),
                YearBracket::new(2000, 2003, 0.13, 0.08),
                YearBracket::new(2004, 2007, 0.13, 0.07),
                YearBracket::new(2008, 2012, 0.10, 0.06),
                YearBracket::new(2013, 2024, 0.07, 0.04),
            ],
        );
        vehicle(
            "Motorcycles",
            "Motor Gasoline",
            vec![
                YearBracket::new(1960, 1995, 0.90, 0.19),
                YearBracket::new(1996, 2005, 0.25, 0.09),
                YearBracket::new(2006, 2024, 0.09, 0.02),
            ],
        );
        vehicle(
            "Heavy Duty Trucks - Diesel",
            "Diesel Fuel",
            vec![
                YearBracket::new(1985, 2006, 0.0051, 0.0048),
                YearBracket::new(2007, 2024, 0.0095, 0.0431),
            ],
        );
        vehicle(
            "Buses",
            "Diesel Fuel",
            vec![
                YearBracket::new(1980, 2006, 0.0050, 0.0047),
                YearBracket::new(2007, 2024, 0.0092, 0.0419),
            ],
        );

        let mut road_fuels = HashMap::new();
        let mut fuel = |name: &str, factor: RoadFuel| {
            road_fuels.insert(name.to_string(), factor);
        };
        fuel("Motor Gasoline", RoadFuel::gallons(8887.0));
        fuel("Diesel Fuel", RoadFuel::gallons(10155.0));
        fuel("Residual Fuel Oil", RoadFuel::gallons(10434.0));
        fuel("Aviation Gasoline", RoadFuel::gallons(8760.0));
        fuel("Kerosene-Type Jet Fuel", RoadFuel::gallons(9330.0));
        fuel("Liquefied Petroleum Gases (LPG)", RoadFuel::gallons(6267.0));
        fuel("Ethanol", RoadFuel::gallons(5678.0).biomass());
        fuel("Biodiesel", RoadFuel::gallons(9433.0).biomass());
        fuel("Liquefied Natural Gas (LNG)", RoadFuel::gallons(4274.0));
        fuel(
            "Compressed Natural Gas (CNG)",
            RoadFuel {
                co2_kg_per_1000: 53.06,
                unit: "scf".to_string(),
                biogenic: false,
            },
        );

        let mut off_road = HashMap::new();
        let mut equipment = |name: &str, fuels: &[(&str, f64)]| {
            off_road.insert(
                name.to_string(),
                fuels
                    .iter()
                    .map(|(f, co2)| (f.to_string(), *co2))
                    .collect::<HashMap<_, _>>(),
            );
        };

        let two_stroke = ("Gasoline (2 stroke)", 8900.0);
        let four_stroke = ("Gasoline (4 stroke)", 8800.0);
        let diesel = ("Diesel", 10155.0);
        let lpg = ("LPG", 6267.0);

        equipment(
            "Ships and Boats",
            &[("Residual Fuel Oil", 10434.0), two_stroke, four_stroke, diesel],
        );
        equipment("Locomotives", &[diesel]);
        equipment(
            "Aircraft",
            &[("Kerosene-Type Jet Fuel", 9330.0), ("Aviation Gasoline", 8760.0)],
        );
        equipment("Agricultural Equipment", &[two_stroke, four_stroke, diesel, lpg]);
        equipment("Construction Equipment", &[two_stroke, four_stroke, diesel, lpg]);
        equipment("Lawn and Garden Equipment", &[two_stroke, four_stroke, diesel, lpg]);
        equipment("Airport Equipment", &[("Gasoline", 8800.0), diesel, lpg]);
        equipment("Industrial Equipment", &[two_stroke, four_stroke, diesel, lpg]);
        equipment("Logging Equipment", &[two_stroke, four_stroke, diesel]);
        equipment("Railroad Equipment", &[("Gasoline", 8800.0), diesel, lpg]);
        equipment("Recreational Equipment", &[two_stroke, four_stroke, diesel, lpg]);

        Self {
            on_road,
            road_fuels,
            off_road,
        }
    }

    pub fn on_road_vehicle(&self, vehicle: &str) -> Result<&OnRoadVehicle, FactorError> {
        self.on_road.get(vehicle).ok_or_else(|| FactorError::NotFound {
            table: "on-road vehicle",
            selector: vehicle.to_string(),
        })
    }

    pub fn road_fuel(&self, fuel: &str) -> Result<&RoadFuel, FactorError> {
        self.road_fuels.get(fuel).ok_or_else(|| FactorError::NotFound {
            table: "road fuel",
            selector: fuel.to_string(),
        })
    }

    /// CO2 kg per 1000 gallons for one piece of non-road equipment.
    pub fn off_road_fuel(&self, vehicle: &str, fuel: &str) -> Result<f64, FactorError> {
        let fuels = self.off_road.get(vehicle).ok_or_else(|| FactorError::NotFound {
            table: "non-road vehicle",
            selector: vehicle.to_string(),
        })?;
        fuels.get(fuel).copied().ok_or_else(|| FactorError::NotFound {
            table: "non-road fuel",
            selector: format!("{vehicle} / {fuel}"),
        })
    }

    pub fn on_road_vehicles(&self) -> impl Iterator<Item = &str> {
        self.on_road.keys().map(String::as_str)
    }

    pub fn off_road_vehicles(&self) -> impl Iterator<Item = &str> {
        self.off_road.keys().map(String::as_str)
    }
}
