//! ghg-store: Reference storage adapters for the inventory engine
//!
//! Two implementations of the `ghg-core` storage port:
//! - `MemoryStore`: records in a HashMap behind an async RwLock
//! - `JsonFileStore`: one pretty-printed JSON file per record id

pub mod jsonfile;
pub mod memory;

pub use jsonfile::JsonFileStore;
pub use memory::MemoryStore;
