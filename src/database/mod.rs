pub mod manager;
pub mod memory;
pub mod models;
pub mod store;

pub use manager::PgDocumentStore;
pub use memory::MemoryStore;
pub use store::{id_key, Collection, DeleteResult, DocumentStore, InsertOneResult, StoreError, UpdateResult};

/// A schemaless JSON document as stored in a collection.
pub type Document = serde_json::Map<String, serde_json::Value>;
