//! ghg-core: Emissions calculation and aggregation engine
//!
//! This crate contains the pure calculation logic with NO storage backend:
//! - Unit conversion tables and GWP weighting
//! - Builtin emission factor catalog (overridable from YAML)
//! - Twelve category calculators with all-or-nothing row validation
//! - Scope aggregation and the derived summary report
//! - Inventory session orchestration and the storage port trait
//!
//! Storage implementations (in-memory, JSON file) live in ghg-store.

pub mod calc;
pub mod catalog;
pub mod gwp;
pub mod row;
pub mod session;
pub mod store;
pub mod summary;
pub mod types;
pub mod units;

// Re-export the calculation surface
pub use calc::{
    BusinessTravelCalculator, BusinessTravelRow, CommutingCalculator, CommutingRow,
    ElectricityCalculator, ElectricityRow, FireSuppressionCalculator, FireSuppressionMethod,
    FireSuppressionRow, MobileCalculator, MobileRow, OffsetsCalculator, OffsetsRow,
    PurchasedGasesCalculator, PurchasedGasesRow, RefrigerationCalculator, RefrigerationMethod,
    RefrigerationRow, RoadStatus, StationaryCalculator, StationaryRow, SteamCalculator, SteamRow,
    UpstreamCalculator, UpstreamRow, WasteCalculator, WasteRow,
};

// Re-export reference data and shared result types
pub use catalog::{DisposalRoute, FactorError, ReferenceData, TravelBasis};
pub use gwp::GwpTable;
pub use session::{InventorySession, PersistenceAdvisory};
pub use store::{InventoryRecord, InventoryStore, StoreError};
pub use summary::{aggregate, ScopeSummary, SummaryReport};
pub use types::{
    CalcOutcome, Category, CategoryResult, CategoryTotal, OffsetTotals, ScopeBucket,
};
pub use units::{ConvertError, FuelState, UnitClass, UnitTable};
