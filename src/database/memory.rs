use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{assign_id, id_key, Collection, DeleteResult, DocumentStore, InsertOneResult, StoreError, UpdateResult};
use super::Document;
use crate::filter::{Filter, ID_FIELD};

/// Process-local document store. Documents keep insertion order, which is
/// the natural order of every unsorted query.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(doc: &Document, key: &str) -> bool {
    doc.get(ID_FIELD).and_then(id_key).as_deref() == Some(key)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map(|docs| filter.apply(docs.iter())).unwrap_or_default())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let mut first = filter.clone();
        first.limit(1, None);
        Ok(self.find(collection, &first).await?.into_iter().next())
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, StoreError> {
        let (key, id) = assign_id(&mut doc)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|existing| has_id(existing, &key)) {
            return Err(StoreError::DuplicateId(key));
        }
        docs.push(doc);
        Ok(InsertOneResult { acknowledged: true, inserted_id: id })
    }

    async fn upsert_one(&self, collection: Collection, id: &str, fields: Document) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        match docs.iter_mut().find(|doc| has_id(doc, id)) {
            Some(doc) => {
                let mut merged = doc.clone();
                merged.extend(fields.into_iter().filter(|(k, _)| k != ID_FIELD));
                let modified = merged != *doc;
                *doc = merged;
                Ok(UpdateResult::matched(modified))
            }
            None => {
                let mut doc = Document::new();
                doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                doc.extend(fields);
                docs.push(doc);
                Ok(UpdateResult::upserted(id))
            }
        }
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let deleted_count = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteResult { acknowledged: true, deleted_count })
    }

    async fn estimated_document_count(&self, collection: Collection) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let count = collections.get(&collection).map_or(0, Vec::len);
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
