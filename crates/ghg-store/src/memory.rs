//! In-memory record store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use ghg_core::store::{InventoryRecord, InventoryStore, StoreError};
use ghg_core::types::Category;

/// Records in a HashMap behind an async RwLock. Suitable for tests and
/// short-lived sessions; nothing survives the process.
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, InventoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn upsert_category(
        &self,
        record_id: Uuid,
        category: Category,
        rows: Value,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records
            .entry(record_id)
            .or_insert_with(|| InventoryRecord::new(record_id, ""))
            .set_category_rows(category, rows);
        Ok(())
    }

    async fn rename_record(&self, record_id: Uuid, name: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records
            .entry(record_id)
            .or_insert_with(|| InventoryRecord::new(record_id, name))
            .rename(name);
        Ok(())
    }

    async fn load_record(&self, record_id: Uuid) -> Result<Option<InventoryRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&record_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_creates_then_updates_in_place() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        store
            .upsert_category(id, Category::Waste, json!([{"material": "Glass"}]))
            .await
            .unwrap();
        store
            .upsert_category(id, Category::Waste, json!([{"material": "Mixed Paper"}]))
            .await
            .unwrap();
        store
            .upsert_category(id, Category::Commuting, json!([{"mode": "Bus"}]))
            .await
            .unwrap();

        assert_eq!(store.record_count().await, 1);
        let record = store.load_record(id).await.unwrap().unwrap();
        assert_eq!(record.categories.len(), 2);
        assert_eq!(
            record.category_rows(Category::Waste).unwrap()[0]["material"],
            "Mixed Paper"
        );
    }

    #[tokio::test]
    async fn rename_never_touches_categories() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .upsert_category(id, Category::Waste, json!([{"material": "Glass"}]))
            .await
            .unwrap();
        store.rename_record(id, "FY2025").await.unwrap();

        let record = store.load_record(id).await.unwrap().unwrap();
        assert_eq!(record.name, "FY2025");
        assert_eq!(
            record.category_rows(Category::Waste).unwrap()[0]["material"],
            "Glass"
        );
    }

    #[tokio::test]
    async fn unknown_record_loads_as_none() {
        let store = MemoryStore::new();
        assert!(store.load_record(Uuid::new_v4()).await.unwrap().is_none());
    }
}
