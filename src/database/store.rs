use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::Document;
use crate::config::ConfigError;
use crate::filter::{Filter, FilterError, ID_FIELD};

/// Errors from a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid query: {0}")]
    Filter(#[from] FilterError),

    #[error("Document _id must not be an array")]
    InvalidId,

    #[error("Duplicate document _id: {0}")]
    DuplicateId(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The four collections of the food ordering database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Foods,
    Orders,
    Feedbacks,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 4] = [Collection::Foods, Collection::Orders, Collection::Feedbacks, Collection::Users];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Foods => "foods",
            Collection::Orders => "orders",
            Collection::Feedbacks => "feedbacks",
            Collection::Users => "users",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

impl UpdateResult {
    pub fn upserted(id: &str) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_string()),
            upserted_count: 1,
        }
    }

    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Collection-scoped document operations. Every call is atomic for a single
/// document; nothing spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// First document matching `filter`, or `None`.
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// Insert `doc` as-is, generating `_id` when absent.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, StoreError>;

    /// Merge `fields` into the document with `_id == id`, creating a document
    /// holding only `_id` and `fields` when none exists.
    async fn upsert_one(&self, collection: Collection, id: &str, fields: Document) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError>;

    /// Cheap count that may lag concurrent writes.
    async fn estimated_document_count(&self, collection: Collection) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Row key of an `_id` value: strings as-is, other scalars and objects by
/// their JSON text. Arrays cannot be ids.
pub fn id_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) => None,
        other => Some(other.to_string()),
    }
}

/// Resolve the `_id` of a document about to be inserted, returning its row
/// key and the value echoed back as `insertedId`. A supplied `_id` is kept
/// unchanged in the document.
pub(crate) fn assign_id(doc: &mut Document) -> Result<(String, Value), StoreError> {
    match doc.get(ID_FIELD) {
        Some(id) => id_key(id).map(|key| (key, id.clone())).ok_or(StoreError::InvalidId),
        None => {
            let id = Uuid::new_v4().to_string();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok((id.clone(), Value::String(id)))
        }
    }
}
