//! Scope aggregation and the derived summary report.
//!
//! The report is recomputed whole from the current category results on
//! every call; nothing here is stored, so it can never be partially stale.
//! Offsets are subtracted per bucket. A bucket's net may go negative and
//! stays negative in the grand total; the zero floor is display-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Category, CategoryResult, CategoryTotal, OffsetTotals};

/// One scope bucket's line: gross emissions, offsets applied against the
/// bucket, and the signed net.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScopeSummary {
    pub gross_t: f64,
    pub offsets_t: f64,
    pub net_t: f64,
}

impl ScopeSummary {
    fn new(gross_t: f64, offsets_t: f64) -> Self {
        Self {
            gross_t,
            offsets_t,
            net_t: gross_t - offsets_t,
        }
    }

    /// Net for display, floored at zero. Reports show an over-offset bucket
    /// as zero while the signed net still feeds the grand total.
    pub fn displayed_net_t(&self) -> f64 {
        self.net_t.max(0.0)
    }
}

/// The derived inventory summary: per-category totals, the four scope
/// buckets, supplemental biogenic CO2, and the signed grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub categories: BTreeMap<Category, CategoryTotal>,
    pub scope1: ScopeSummary,
    pub scope2_location: ScopeSummary,
    pub scope2_market: ScopeSummary,
    pub scope3: ScopeSummary,
    /// Supplemental biomass CO2 lines, reported beside the scopes and never
    /// added to them.
    pub biogenic_stationary_t: f64,
    pub biogenic_mobile_t: f64,
    /// Sum of the four bucket nets, unfloored.
    pub total_net_t: f64,
}

impl SummaryReport {
    pub fn displayed_total_t(&self) -> f64 {
        self.total_net_t.max(0.0)
    }
}

fn single(results: &BTreeMap<Category, CategoryResult>, category: Category) -> f64 {
    match results.get(&category).map(|r| &r.total) {
        Some(CategoryTotal::Single { co2e_t }) => *co2e_t,
        _ => 0.0,
    }
}

fn dual(results: &BTreeMap<Category, CategoryResult>, category: Category) -> (f64, f64) {
    match results.get(&category).map(|r| &r.total) {
        Some(CategoryTotal::Dual {
            location_t,
            market_t,
        }) => (*location_t, *market_t),
        _ => (0.0, 0.0),
    }
}

fn biogenic(results: &BTreeMap<Category, CategoryResult>, category: Category) -> f64 {
    results
        .get(&category)
        .and_then(|r| r.biogenic_co2_t)
        .unwrap_or(0.0)
}

/// Aggregate the committed category results into a report. A category with
/// no committed result contributes zero.
pub fn aggregate(results: &BTreeMap<Category, CategoryResult>) -> SummaryReport {
    let offsets = match results.get(&Category::Offsets).map(|r| &r.total) {
        Some(CategoryTotal::Offsets(totals)) => *totals,
        _ => OffsetTotals::default(),
    };

    let scope1_gross = single(results, Category::StationaryCombustion)
        + single(results, Category::MobileSources)
        + single(results, Category::RefrigerationAc)
        + single(results, Category::FireSuppression)
        + single(results, Category::PurchasedGases);
    let (electricity_loc, electricity_mkt) = dual(results, Category::Electricity);
    let (steam_loc, steam_mkt) = dual(results, Category::Steam);
    let scope3_gross = single(results, Category::BusinessTravel)
        + single(results, Category::Commuting)
        + single(results, Category::UpstreamTransportation)
        + single(results, Category::Waste);

    let scope1 = ScopeSummary::new(scope1_gross, offsets.scope1_t);
    let scope2_location =
        ScopeSummary::new(electricity_loc + steam_loc, offsets.scope2_location_t);
    let scope2_market = ScopeSummary::new(electricity_mkt + steam_mkt, offsets.scope2_market_t);
    let scope3 = ScopeSummary::new(scope3_gross, offsets.scope3_t);

    let total_net_t = scope1.net_t + scope2_location.net_t + scope2_market.net_t + scope3.net_t;

    SummaryReport {
        categories: results
            .iter()
            .map(|(category, result)| (*category, result.total.clone()))
            .collect(),
        scope1,
        scope2_location,
        scope2_market,
        scope3,
        biogenic_stationary_t: biogenic(results, Category::StationaryCombustion),
        biogenic_mobile_t: biogenic(results, Category::MobileSources),
        total_net_t,
    }
}
