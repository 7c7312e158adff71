//! In-memory document store
//!
//! Stand-in for the real adapter behind the same trait. Used by tests and
//! offline runs; collections keep insertion order, and the whole store can
//! be flipped unavailable to exercise connection-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::backend::{Document, DocumentStore};
use super::error::{StoreError, StoreResult};

/// In-memory store: collection name -> ordered documents
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Flip the simulated liveness of the store
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of a collection's documents, for inspection
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.read_collections()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unreachable("simulated outage"))
        }
    }

    fn read_collections(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Document>>> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_collections(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Document>>> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// True iff every filter key is present in `doc` with an equal value
    fn matches(doc: &Document, filter: &Document) -> bool {
        filter.iter().all(|(key, value)| doc.get(key) == Some(value))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn create(&self, collection: &str, doc: &Document) -> StoreResult<()> {
        self.check_available()?;
        tracing::debug!(collection, document = %serde_json::Value::Object(doc.clone()), "inserting document");
        self.write_collections()
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(())
    }

    async fn read(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        Ok(self.documents(collection))
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Document,
        fields: &Document,
    ) -> StoreResult<u64> {
        self.check_available()?;
        let mut collections = self.write_collections();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(doc) = docs.iter_mut().find(|doc| Self::matches(doc, filter)) else {
            return Ok(0);
        };
        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }
        Ok(1)
    }

    async fn delete(&self, collection: &str, filter: &Document) -> StoreResult<u64> {
        self.check_available()?;
        tracing::debug!(collection, filter = %serde_json::Value::Object(filter.clone()), "deleting document");
        let mut collections = self.write_collections();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| Self::matches(doc, filter)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().expect("test document").clone()
    }

    #[tokio::test]
    async fn test_create_then_read_preserves_order() {
        let store = MemoryStore::new();
        store
            .create("cities", &doc(json!({"name": "Albany", "state_code": "NY"})))
            .await
            .unwrap();
        store
            .create("cities", &doc(json!({"name": "Boston", "state_code": "MA"})))
            .await
            .unwrap();

        let docs = store.read("cities").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["name"], "Albany");
        assert_eq!(docs[1]["name"], "Boston");
    }

    #[tokio::test]
    async fn test_read_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.read("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_at_most_one() {
        let store = MemoryStore::new();
        let springfield = doc(json!({"name": "Springfield", "state_code": "IL"}));
        store.create("cities", &springfield).await.unwrap();
        store.create("cities", &springfield).await.unwrap();

        let removed = store.delete("cities", &springfield).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.read("cities").await.unwrap().len(), 1);

        let removed = store
            .delete("cities", &doc(json!({"name": "Nowhere", "state_code": "ZZ"})))
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_update_patches_first_match() {
        let store = MemoryStore::new();
        store
            .create("cities", &doc(json!({"name": "Reno", "state_code": "NV"})))
            .await
            .unwrap();

        let matched = store
            .update(
                "cities",
                &doc(json!({"name": "Reno", "state_code": "NV"})),
                &doc(json!({"name": "Sparks"})),
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let docs = store.read("cities").await.unwrap();
        assert_eq!(docs[0]["name"], "Sparks");
        assert_eq!(docs[0]["state_code"], "NV");
    }

    #[tokio::test]
    async fn test_update_without_match_reports_zero() {
        let store = MemoryStore::new();
        let matched = store
            .update(
                "cities",
                &doc(json!({"name": "Reno"})),
                &doc(json!({"name": "Sparks"})),
            )
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_outage_switch() {
        let store = MemoryStore::new();
        assert!(store.ping().await);

        store.set_available(false);
        assert!(!store.ping().await);
        assert!(matches!(
            store.read("cities").await,
            Err(StoreError::Unreachable(_))
        ));
        assert!(matches!(
            store
                .create("cities", &doc(json!({"name": "Reno", "state_code": "NV"})))
                .await,
            Err(StoreError::Unreachable(_))
        ));

        store.set_available(true);
        assert!(store.ping().await);
        assert!(store.read("cities").await.is_ok());
    }
}
