//! Unit conversion for activity quantities.
//!
//! Five unit classes, one multiplicative pair table per class. Conversions
//! never cross classes, and a missing unit or missing pair is a hard error
//! rather than a silent pass-through. Identity conversions short-circuit
//! before any lookup, so they succeed even for units the table has never
//! heard of.
//!
//! Canonical unit tokens (shared by rows and factor bases):
//! mass `lb kg g "short ton" "metric ton"`, volume `gal L bbl scf ft3 m3`,
//! energy `Btu kJ MJ MMBtu therm kWh MWh`, distance `mile km m`, time
//! `hr min s`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pair table for one class: from-unit → to-unit → multiplier.
pub type PairMap = HashMap<String, HashMap<String, f64>>;

// ─── Unit classes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitClass {
    Mass,
    Volume,
    Energy,
    Distance,
    Time,
}

impl UnitClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitClass::Mass => "mass",
            UnitClass::Volume => "volume",
            UnitClass::Energy => "energy",
            UnitClass::Distance => "distance",
            UnitClass::Time => "time",
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Fuel states ─────────────────────────────────────────────────────────────

/// Physical state of a combustion fuel. Determines which quantity units a
/// row may carry and which unit class converts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelState {
    Solid,
    Gaseous,
    Liquid,
}

impl FuelState {
    pub fn allowed_units(&self) -> &'static [&'static str] {
        match self {
            FuelState::Solid => &["short ton", "metric ton", "lb", "kg", "g"],
            FuelState::Gaseous => &["scf", "ft3", "m3", "L"],
            FuelState::Liquid => &["gal", "L", "bbl"],
        }
    }

    pub fn unit_class(&self) -> UnitClass {
        match self {
            FuelState::Solid => UnitClass::Mass,
            FuelState::Gaseous | FuelState::Liquid => UnitClass::Volume,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelState::Solid => "solid",
            FuelState::Gaseous => "gaseous",
            FuelState::Liquid => "liquid",
        }
    }
}

impl fmt::Display for FuelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unknown {class} unit: {unit}")]
    UnknownUnit { class: UnitClass, unit: String },

    #[error("no {class} conversion from {from} to {to}")]
    NoConversion {
        class: UnitClass,
        from: String,
        to: String,
    },
}

// ─── Conversion table ────────────────────────────────────────────────────────

/// Base magnitudes used to generate the builtin pair tables. Each entry is
/// (token, amount of the class base unit per one of this unit).
const MASS_IN_KG: &[(&str, f64)] = &[
    ("lb", 0.453592),
    ("kg", 1.0),
    ("g", 0.001),
    ("short ton", 907.18474),
    ("metric ton", 1000.0),
];

const VOLUME_IN_L: &[(&str, f64)] = &[
    ("gal", 3.78541),
    ("L", 1.0),
    ("bbl", 158.987),
    ("m3", 1000.0),
    ("scf", 28.3168),
    ("ft3", 28.3168),
];

const ENERGY_IN_BTU: &[(&str, f64)] = &[
    ("Btu", 1.0),
    ("kJ", 0.947817),
    ("MJ", 947.817),
    ("MMBtu", 1.0e6),
    ("therm", 1.0e5),
    ("kWh", 3412.14),
    ("MWh", 3_412_140.0),
];

const DISTANCE_IN_KM: &[(&str, f64)] = &[("mile", 1.60934), ("km", 1.0), ("m", 0.001)];

const TIME_IN_HR: &[(&str, f64)] = &[("hr", 1.0), ("min", 1.0 / 60.0), ("s", 1.0 / 3600.0)];

/// Multiplicative unit conversion table, one pair map per class.
///
/// The builtin table is generated from base magnitudes so every in-class
/// pair exists. Tables loaded from YAML may be sparse; a pair absent from
/// a sparse table converts with [`ConvertError::NoConversion`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTable {
    mass: PairMap,
    volume: PairMap,
    energy: PairMap,
    distance: PairMap,
    time: PairMap,
}

impl UnitTable {
    pub fn builtin() -> Self {
        Self {
            mass: pairs_from(MASS_IN_KG),
            volume: pairs_from(VOLUME_IN_L),
            energy: pairs_from(ENERGY_IN_BTU),
            distance: pairs_from(DISTANCE_IN_KM),
            time: pairs_from(TIME_IN_HR),
        }
    }

    fn class_map(&self, class: UnitClass) -> &PairMap {
        match class {
            UnitClass::Mass => &self.mass,
            UnitClass::Volume => &self.volume,
            UnitClass::Energy => &self.energy,
            UnitClass::Distance => &self.distance,
            UnitClass::Time => &self.time,
        }
    }

    /// Convert `value` from one unit to another within `class`.
    ///
    /// `from == to` returns `value` unchanged without consulting the table.
    pub fn convert(
        &self,
        value: f64,
        from: &str,
        to: &str,
        class: UnitClass,
    ) -> Result<f64, ConvertError> {
        if from == to {
            return Ok(value);
        }
        let map = self.class_map(class);
        let entries = map.get(from).ok_or_else(|| ConvertError::UnknownUnit {
            class,
            unit: from.to_string(),
        })?;
        match entries.get(to) {
            Some(multiplier) => Ok(value * multiplier),
            None if !map.contains_key(to) => Err(ConvertError::UnknownUnit {
                class,
                unit: to.to_string(),
            }),
            None => Err(ConvertError::NoConversion {
                class,
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    /// True if `unit` appears anywhere in the class table.
    pub fn knows(&self, unit: &str, class: UnitClass) -> bool {
        self.class_map(class).contains_key(unit)
    }
}

fn pairs_from(bases: &[(&str, f64)]) -> PairMap {
    let mut map = PairMap::new();
    for &(from, from_base) in bases {
        let mut entries = HashMap::new();
        for &(to, to_base) in bases {
            if from != to {
                entries.insert(to.to_string(), from_base / to_base);
            }
        }
        map.insert(from.to_string(), entries);
    }
    map
}
