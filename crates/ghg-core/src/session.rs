//! Inventory session: runs calculators against one record and persists
//! committed results.
//!
//! The record identity is explicit; callers mint the `Uuid` and may run any
//! number of sessions side by side. Persistence is fire-and-forget: a clean
//! calculation is committed in memory immediately and written through the
//! storage port in a spawned task. Storage failures never fail or block a
//! calculation; they are logged and surfaced on the advisory channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calc::{
    BusinessTravelCalculator, BusinessTravelRow, CommutingCalculator, CommutingRow,
    ElectricityCalculator, ElectricityRow, FireSuppressionCalculator, FireSuppressionMethod,
    FireSuppressionRow, MobileCalculator, MobileRow, OffsetsCalculator, OffsetsRow,
    PurchasedGasesCalculator, PurchasedGasesRow, RefrigerationCalculator, RefrigerationMethod,
    RefrigerationRow, StationaryCalculator, StationaryRow, SteamCalculator, SteamRow,
    UpstreamCalculator, UpstreamRow, WasteCalculator, WasteRow,
};
use crate::catalog::ReferenceData;
use crate::store::InventoryStore;
use crate::summary::{aggregate, SummaryReport};
use crate::types::{CalcOutcome, Category, CategoryResult};

/// A persistence failure report. Consuming these is optional; every failure
/// is also logged.
#[derive(Debug, Clone)]
pub struct PersistenceAdvisory {
    pub record_id: Uuid,
    /// `None` for record-metadata operations (rename).
    pub category: Option<Category>,
    pub error: String,
}

pub struct InventorySession {
    data: Arc<ReferenceData>,
    store: Arc<dyn InventoryStore>,
    record_id: Uuid,
    record_name: String,
    results: BTreeMap<Category, CategoryResult>,
    advisory_tx: UnboundedSender<PersistenceAdvisory>,
    advisory_rx: Option<UnboundedReceiver<PersistenceAdvisory>>,
}

impl InventorySession {
    pub fn new(
        data: Arc<ReferenceData>,
        store: Arc<dyn InventoryStore>,
        record_id: Uuid,
        record_name: &str,
    ) -> Self {
        let (advisory_tx, advisory_rx) = mpsc::unbounded_channel();
        Self {
            data,
            store,
            record_id,
            record_name: record_name.to_string(),
            results: BTreeMap::new(),
            advisory_tx,
            advisory_rx: Some(advisory_rx),
        }
    }

    pub fn record_id(&self) -> Uuid {
        self.record_id
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    /// Latest committed result for a category, if any calculation has
    /// committed one this session.
    pub fn result(&self, category: Category) -> Option<&CategoryResult> {
        self.results.get(&category)
    }

    /// Take the advisory receiver. Yields `None` after the first call.
    pub fn advisories(&mut self) -> Option<UnboundedReceiver<PersistenceAdvisory>> {
        self.advisory_rx.take()
    }

    /// Recompute the summary report from the committed results.
    pub fn summary(&self) -> SummaryReport {
        aggregate(&self.results)
    }

    /// Rename the record. Local state updates immediately; the store write
    /// is fire-and-forget like category persistence.
    pub fn rename(&mut self, name: &str) {
        self.record_name = name.to_string();
        let store = Arc::clone(&self.store);
        let record_id = self.record_id;
        let name = name.to_string();
        let tx = self.advisory_tx.clone();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match store.rename_record(record_id, &name).await {
                        Ok(()) => info!(record_id = %record_id, name = %name, "record renamed"),
                        Err(e) => {
                            warn!(record_id = %record_id, error = %e, "record rename failed");
                            let _ = tx.send(PersistenceAdvisory {
                                record_id,
                                category: None,
                                error: e.to_string(),
                            });
                        }
                    }
                });
            }
            Err(_) => {
                warn!(record_id = %record_id, "no async runtime; record rename not persisted");
                let _ = tx.send(PersistenceAdvisory {
                    record_id,
                    category: None,
                    error: "no async runtime available".to_string(),
                });
            }
        }
    }

    // ─── Category calculations ───────────────────────────────────────────────

    pub fn calculate_stationary(&mut self, rows: Vec<StationaryRow>) -> CalcOutcome<StationaryRow> {
        let outcome = StationaryCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_mobile(&mut self, rows: Vec<MobileRow>) -> CalcOutcome<MobileRow> {
        let outcome = MobileCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_electricity(
        &mut self,
        rows: Vec<ElectricityRow>,
    ) -> CalcOutcome<ElectricityRow> {
        let outcome = ElectricityCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_steam(&mut self, rows: Vec<SteamRow>) -> CalcOutcome<SteamRow> {
        let outcome = SteamCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_refrigeration(
        &mut self,
        method: RefrigerationMethod,
        rows: Vec<RefrigerationRow>,
    ) -> CalcOutcome<RefrigerationRow> {
        let outcome = RefrigerationCalculator::new(Arc::clone(&self.data)).calculate(method, rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_fire_suppression(
        &mut self,
        method: FireSuppressionMethod,
        rows: Vec<FireSuppressionRow>,
    ) -> CalcOutcome<FireSuppressionRow> {
        let outcome =
            FireSuppressionCalculator::new(Arc::clone(&self.data)).calculate(method, rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_purchased_gases(
        &mut self,
        rows: Vec<PurchasedGasesRow>,
    ) -> CalcOutcome<PurchasedGasesRow> {
        let outcome = PurchasedGasesCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_waste(&mut self, rows: Vec<WasteRow>) -> CalcOutcome<WasteRow> {
        let outcome = WasteCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_business_travel(
        &mut self,
        rows: Vec<BusinessTravelRow>,
    ) -> CalcOutcome<BusinessTravelRow> {
        let outcome = BusinessTravelCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_commuting(&mut self, rows: Vec<CommutingRow>) -> CalcOutcome<CommutingRow> {
        let outcome = CommutingCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_upstream_transportation(
        &mut self,
        rows: Vec<UpstreamRow>,
    ) -> CalcOutcome<UpstreamRow> {
        let outcome = UpstreamCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    pub fn calculate_offsets(&mut self, rows: Vec<OffsetsRow>) -> CalcOutcome<OffsetsRow> {
        let outcome = OffsetsCalculator::new(Arc::clone(&self.data)).calculate(rows);
        self.commit(outcome.result.as_ref());
        outcome
    }

    // ─── Commit path ─────────────────────────────────────────────────────────

    /// Store a committed result and fire persistence. A withheld result
    /// (`None`) leaves the previous commit for that category untouched.
    fn commit(&mut self, result: Option<&CategoryResult>) {
        let Some(result) = result else {
            return;
        };
        self.results.insert(result.category, result.clone());
        self.persist(result.category, result.rows.clone());
    }

    fn persist(&self, category: Category, rows: Value) {
        let store = Arc::clone(&self.store);
        let record_id = self.record_id;
        let tx = self.advisory_tx.clone();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match store.upsert_category(record_id, category, rows).await {
                        Ok(()) => {
                            info!(record_id = %record_id, category = %category, "category rows persisted")
                        }
                        Err(e) => {
                            warn!(
                                record_id = %record_id,
                                category = %category,
                                error = %e,
                                "category persistence failed"
                            );
                            let _ = tx.send(PersistenceAdvisory {
                                record_id,
                                category: Some(category),
                                error: e.to_string(),
                            });
                        }
                    }
                });
            }
            Err(_) => {
                warn!(
                    record_id = %record_id,
                    category = %category,
                    "no async runtime; category result not persisted"
                );
                let _ = tx.send(PersistenceAdvisory {
                    record_id,
                    category: Some(category),
                    error: "no async runtime available".to_string(),
                });
            }
        }
    }
}
