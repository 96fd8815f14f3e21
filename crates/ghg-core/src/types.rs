//! Shared result types for category calculation and scope aggregation.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Categories ──────────────────────────────────────────────────────────────

/// The twelve inventory categories. Serialized names double as the
/// persisted record keys, so they must stay stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StationaryCombustion,
    MobileSources,
    Electricity,
    RefrigerationAc,
    Waste,
    Steam,
    BusinessTravel,
    Commuting,
    UpstreamTransportation,
    PurchasedGases,
    FireSuppression,
    Offsets,
}

impl Category {
    /// Persisted record key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            Category::StationaryCombustion => "stationary_combustion",
            Category::MobileSources => "mobile_sources",
            Category::Electricity => "electricity",
            Category::RefrigerationAc => "refrigeration_ac",
            Category::Waste => "waste",
            Category::Steam => "steam",
            Category::BusinessTravel => "business_travel",
            Category::Commuting => "commuting",
            Category::UpstreamTransportation => "upstream_transportation",
            Category::PurchasedGases => "purchased_gases",
            Category::FireSuppression => "fire_suppression",
            Category::Offsets => "offsets",
        }
    }

    pub fn all() -> [Category; 12] {
        [
            Category::StationaryCombustion,
            Category::MobileSources,
            Category::Electricity,
            Category::RefrigerationAc,
            Category::Waste,
            Category::Steam,
            Category::BusinessTravel,
            Category::Commuting,
            Category::UpstreamTransportation,
            Category::PurchasedGases,
            Category::FireSuppression,
            Category::Offsets,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─── Scope buckets ───────────────────────────────────────────────────────────

/// Aggregation bucket an offset entry is applied against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeBucket {
    #[serde(rename = "Scope 1")]
    Scope1,
    #[serde(rename = "Scope 2 - Location-Based")]
    Scope2Location,
    #[serde(rename = "Scope 2 - Market-Based")]
    Scope2Market,
    #[serde(rename = "Scope 3")]
    Scope3,
}

impl ScopeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeBucket::Scope1 => "Scope 1",
            ScopeBucket::Scope2Location => "Scope 2 - Location-Based",
            ScopeBucket::Scope2Market => "Scope 2 - Market-Based",
            ScopeBucket::Scope3 => "Scope 3",
        }
    }
}

impl fmt::Display for ScopeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Category totals ─────────────────────────────────────────────────────────

/// Offset magnitudes per scope bucket, in CO2e metric tons. Stored positive;
/// the aggregator applies them subtractively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetTotals {
    pub scope1_t: f64,
    pub scope2_location_t: f64,
    pub scope2_market_t: f64,
    pub scope3_t: f64,
}

/// A category's committed total. Most categories produce a single figure;
/// purchased-energy categories produce a location/market pair; the offsets
/// category produces per-bucket magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryTotal {
    Single { co2e_t: f64 },
    Dual { location_t: f64, market_t: f64 },
    Offsets(OffsetTotals),
}

/// Committed outcome of one category calculation: the total, an optional
/// supplemental biogenic CO2 figure, and a snapshot of the rows it was
/// computed from (the persistence payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub total: CategoryTotal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biogenic_co2_t: Option<f64>,
    pub rows: serde_json::Value,
}

// ─── Calculation outcome ─────────────────────────────────────────────────────

/// What a calculator hands back: every row re-annotated (error and CO2e
/// slots set or cleared), plus the category result only when no row carries
/// an error. A withheld result means nothing is committed or persisted.
#[derive(Debug, Clone)]
pub struct CalcOutcome<R> {
    pub rows: Vec<R>,
    pub result: Option<CategoryResult>,
}

impl<R> CalcOutcome<R> {
    pub fn is_clean(&self) -> bool {
        self.result.is_some()
    }
}
