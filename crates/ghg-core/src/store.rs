//! Inventory record storage port.
//!
//! Calculators never talk to storage directly; a session persists committed
//! row snapshots through this trait. Implementations live in `ghg-store`
//! (in-memory and JSON-file backends).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::Category;

/// Error type for record storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// One inventory record: identity, display name, stamps, and the persisted
/// row payloads keyed by category. Keys are the categories' stable persisted
/// names (`stationary_combustion`, `mobile_sources`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: BTreeMap<String, Value>,
}

impl InventoryRecord {
    pub fn new(id: Uuid, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            categories: BTreeMap::new(),
        }
    }

    pub fn set_category_rows(&mut self, category: Category, rows: Value) {
        self.categories.insert(category.key().to_string(), rows);
        self.updated_at = Utc::now();
    }

    pub fn category_rows(&self, category: Category) -> Option<&Value> {
        self.categories.get(category.key())
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        self.updated_at = Utc::now();
    }
}

/// Abstract record storage. Both mutating operations upsert: a missing
/// record is created rather than reported as an error.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Replace one category's row payload, creating the record if absent.
    async fn upsert_category(
        &self,
        record_id: Uuid,
        category: Category,
        rows: Value,
    ) -> Result<(), StoreError>;

    /// Set the record's display name. Metadata only; category payloads are
    /// never touched.
    async fn rename_record(&self, record_id: Uuid, name: &str) -> Result<(), StoreError>;

    /// Fetch a full record, or `None` when the id has never been written.
    async fn load_record(&self, record_id: Uuid) -> Result<Option<InventoryRecord>, StoreError>;
}
