//! JSON-file record store.
//!
//! One pretty-printed JSON file per record id under a base directory.
//! Writes go through a temp file and rename so a crash mid-write leaves the
//! previous file intact. Mutations serialize on a store-wide lock; a lost
//! read-modify-write would silently drop another category's columns.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use ghg_core::store::{InventoryRecord, InventoryStore, StoreError};
use ghg_core::types::Category;

pub struct JsonFileStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, record_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{record_id}.json"))
    }

    async fn read_record(&self, record_id: Uuid) -> Result<Option<InventoryRecord>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(record_id)).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record(&self, record: &InventoryRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.path_for(record.id);
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "wrote inventory record");
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for JsonFileStore {
    async fn upsert_category(
        &self,
        record_id: Uuid,
        category: Category,
        rows: Value,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self
            .read_record(record_id)
            .await?
            .unwrap_or_else(|| InventoryRecord::new(record_id, ""));
        record.set_category_rows(category, rows);
        self.write_record(&record).await
    }

    async fn rename_record(&self, record_id: Uuid, name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self
            .read_record(record_id)
            .await?
            .unwrap_or_else(|| InventoryRecord::new(record_id, name));
        record.rename(name);
        self.write_record(&record).await
    }

    async fn load_record(&self, record_id: Uuid) -> Result<Option<InventoryRecord>, StoreError> {
        self.read_record(record_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn record_survives_a_reopen() {
        let dir = TempDir::new().unwrap();
        let id = Uuid::new_v4();

        {
            let store = JsonFileStore::new(dir.path());
            store
                .upsert_category(id, Category::Electricity, json!([{"region": "US Average"}]))
                .await
                .unwrap();
            store.rename_record(id, "FY2025").await.unwrap();
        }

        let reopened = JsonFileStore::new(dir.path());
        let record = reopened.load_record(id).await.unwrap().unwrap();
        assert_eq!(record.name, "FY2025");
        assert_eq!(
            record.category_rows(Category::Electricity).unwrap()[0]["region"],
            "US Average"
        );
    }

    #[tokio::test]
    async fn each_record_gets_its_own_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store
            .upsert_category(first, Category::Waste, json!([]))
            .await
            .unwrap();
        store
            .upsert_category(second, Category::Waste, json!([]))
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&format!("{first}.json")));
        assert!(files.contains(&format!("{second}.json")));
    }

    #[tokio::test]
    async fn upserts_accumulate_category_columns() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let id = Uuid::new_v4();

        store
            .upsert_category(id, Category::Waste, json!([{"material": "Glass"}]))
            .await
            .unwrap();
        store
            .upsert_category(id, Category::Offsets, json!([{"instrument": "Carbon Offsets"}]))
            .await
            .unwrap();

        let record = store.load_record(id).await.unwrap().unwrap();
        assert_eq!(record.categories.len(), 2);
        assert!(record.category_rows(Category::Waste).is_some());
        assert!(record.category_rows(Category::Offsets).is_some());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let id = Uuid::new_v4();
        std::fs::write(dir.path().join(format!("{id}.json")), "not json").unwrap();

        let result = store.load_record(id).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn missing_base_dir_is_created_on_first_write() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("records").join("ghg");
        let store = JsonFileStore::new(&nested);
        let id = Uuid::new_v4();

        store
            .upsert_category(id, Category::Commuting, json!([]))
            .await
            .unwrap();
        assert!(nested.join(format!("{id}.json")).exists());
    }
}
