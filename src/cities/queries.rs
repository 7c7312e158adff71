//! City queries
//!
//! Owns the in-memory city cache and keeps it in front of the persistent
//! collection with a best-effort write-through policy: the cache write is
//! authoritative for the caller-visible result, and a failed store write is
//! logged and dropped. Reads fail loudly when the store is unreachable;
//! writes never do. The acceptable drift window is the process lifetime:
//! the cache is loaded once and never refreshed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{QueryError, QueryResult};
use crate::store::{Document, DocumentStore};

/// Persistent collection backing the cache
pub const CITY_COLLECTION: &str = "cities";

/// Generated internal identifier field
pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const STATE_CODE: &str = "state_code";

const MIN_ID_LEN: usize = 1;

type CityCache = HashMap<String, Document>;

/// City cache + store synchronization
///
/// Constructed once at process start and shared by handle; the cache is
/// populated lazily on the first read and kept for the life of the process.
pub struct CityQueries {
    store: Arc<dyn DocumentStore>,
    cache: RwLock<CityCache>,
}

impl CityQueries {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// True iff `id` looks like a valid city id
    pub fn is_valid_id(id: &str) -> bool {
        id.len() >= MIN_ID_LEN
    }

    /// Generate a new internal city id
    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, CityCache> {
        // A poisoned lock only means a writer panicked; the map is usable.
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, CityCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn can_connect(&self) -> bool {
        self.store.ping().await
    }

    fn require_record(fields: &Value) -> QueryResult<&Document> {
        fields
            .as_object()
            .ok_or_else(|| QueryError::invalid_argument("expected a JSON object"))
    }

    fn require_field<'a>(rec: &'a Document, field: &str) -> QueryResult<&'a str> {
        rec.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| QueryError::invalid_argument(format!("missing city {field}")))
    }

    fn field_eq(rec: &Document, field: &str, value: &str) -> bool {
        rec.get(field).and_then(Value::as_str) == Some(value)
    }

    /// Natural key filter for the persistent collection
    fn natural_key(rec: &Document) -> Document {
        let mut filter = Document::new();
        for field in [NAME, STATE_CODE] {
            if let Some(value) = rec.get(field) {
                filter.insert(field.to_string(), value.clone());
            }
        }
        filter
    }

    /// Create a new city in the cache and, best-effort, in the store.
    ///
    /// The cache insert is unconditional; a store failure leaves the two
    /// diverged, with the cache authoritative until process restart.
    /// Returns the generated id.
    pub async fn create(&self, fields: &Value) -> QueryResult<String> {
        let rec = Self::require_record(fields)?;
        Self::require_field(rec, NAME)?;
        Self::require_field(rec, STATE_CODE)?;

        let new_id = Self::next_id();
        let mut cached = rec.clone();
        cached.insert(ID.to_string(), Value::String(new_id.clone()));
        self.write_cache().insert(new_id.clone(), cached);

        // Store copy is written without the generated id.
        if let Err(err) = self.store.create(CITY_COLLECTION, rec).await {
            warn!(error = %err, "store create failed; cache retains the record");
        }

        Ok(new_id)
    }

    /// Check connectivity and populate the cache from the store if it is
    /// empty. A non-empty cache is returned as-is, never refreshed.
    async fn ensure_loaded(&self) -> QueryResult<()> {
        if !self.can_connect().await {
            return Err(QueryError::connection_failure("cannot connect to store"));
        }
        if !self.read_cache().is_empty() {
            return Ok(());
        }

        let recs = self.store.read(CITY_COLLECTION).await?;
        let mut cache = self.write_cache();
        for mut rec in recs {
            // Keep a usable id: the stored one if present, else a fresh one.
            let id = rec
                .get(ID)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(Self::next_id);
            rec.insert(ID.to_string(), Value::String(id.clone()));
            cache.insert(id, rec);
        }
        Ok(())
    }

    /// Return a snapshot of the cache (id -> record), lazily loading it
    /// from the store on first use. Fails with a connection failure when
    /// the store is unreachable.
    pub async fn read(&self) -> QueryResult<CityCache> {
        self.ensure_loaded().await?;
        Ok(self.read_cache().clone())
    }

    /// Return a single city record by its internal id, or `None`
    pub async fn read_one(&self, id: &str) -> QueryResult<Option<Document>> {
        if !Self::is_valid_id(id) {
            return Err(QueryError::invalid_argument(format!(
                "invalid city id: {id:?}"
            )));
        }
        self.ensure_loaded().await?;
        Ok(self.read_cache().get(id).cloned())
    }

    /// Merge `updates` into the cached record for `id` and return the new
    /// record. The store patch is best-effort and keyed by the record's
    /// pre-update natural key, so a patch that renames the city silently
    /// misses the persisted copy.
    pub async fn update(&self, id: &str, updates: &Value) -> QueryResult<Document> {
        if !Self::is_valid_id(id) {
            return Err(QueryError::invalid_argument(format!(
                "invalid city id: {id:?}"
            )));
        }
        let updates = Self::require_record(updates)?;

        self.ensure_loaded().await?;

        let (new_rec, filter) = {
            let mut cache = self.write_cache();
            let rec = cache
                .get(id)
                .ok_or_else(|| QueryError::not_found(format!("no such city: {id}")))?;
            let filter = Self::natural_key(rec);

            let mut new_rec = rec.clone();
            for (key, value) in updates {
                new_rec.insert(key.clone(), value.clone());
            }
            cache.insert(id.to_string(), new_rec.clone());
            (new_rec, filter)
        };

        if let Err(err) = self.store.update(CITY_COLLECTION, &filter, updates).await {
            warn!(error = %err, "store update failed; cache retains the new record");
        }

        Ok(new_rec)
    }

    /// Remove a city by its internal id.
    ///
    /// Only the cache is consulted for existence; the store delete (by the
    /// removed record's natural key) is best-effort.
    pub async fn delete_by_id(&self, id: &str) -> QueryResult<()> {
        let rec = self
            .write_cache()
            .remove(id)
            .ok_or_else(|| QueryError::not_found(format!("no such city: {id}")))?;

        if rec.contains_key(NAME) && rec.contains_key(STATE_CODE) {
            let filter = Self::natural_key(&rec);
            if let Err(err) = self.store.delete(CITY_COLLECTION, &filter).await {
                warn!(error = %err, "store delete failed; cache entry removed");
            }
        }
        Ok(())
    }

    /// Remove a city by its `(name, state_code)` natural key.
    ///
    /// The store delete happens first and is authoritative: zero documents
    /// removed means not found. Every matching cache entry is then removed
    /// (duplicates included).
    pub async fn delete_by_natural_key(&self, name: &str, state_code: &str) -> QueryResult<()> {
        let mut filter = Document::new();
        filter.insert(NAME.to_string(), Value::String(name.to_string()));
        filter.insert(STATE_CODE.to_string(), Value::String(state_code.to_string()));

        let removed = self.store.delete(CITY_COLLECTION, &filter).await?;
        if removed < 1 {
            return Err(QueryError::not_found(format!(
                "city not found: {name}, {state_code}"
            )));
        }

        self.write_cache().retain(|_, rec| {
            !(Self::field_eq(rec, NAME, name) && Self::field_eq(rec, STATE_CODE, state_code))
        });
        Ok(())
    }

    /// Number of cities known via a full `read()` (forces the connectivity
    /// check and the lazy load)
    pub async fn num_cities(&self) -> QueryResult<usize> {
        Ok(self.read().await?.len())
    }
}
