//! Document store trait
//!
//! The seam between the query modules and the backing database. The real
//! adapter wraps the driver; tests plug in an in-memory stand-in.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::StoreResult;

/// A single stored record: a JSON object
pub type Document = Map<String, Value>;

/// Generic operations against a document database
///
/// Every operation establishes the connection on first use; a store that
/// cannot be reached reports `StoreError::Unreachable`. Filters match on
/// exact equality of every filter key, and `update`/`delete` target at most
/// one document (filters are expected to carry a unique natural key).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Boolean liveness signal; never errors
    async fn ping(&self) -> bool;

    /// Insert a single document into a collection
    async fn create(&self, collection: &str, doc: &Document) -> StoreResult<()>;

    /// Read all documents from a collection, in stored order, with the
    /// store-internal identifier field stripped
    async fn read(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Patch the first document matching `filter` with `fields`
    /// (shallow key overwrite); returns the number of documents matched
    async fn update(
        &self,
        collection: &str,
        filter: &Document,
        fields: &Document,
    ) -> StoreResult<u64>;

    /// Delete the first document matching `filter`; returns the number of
    /// documents removed (0 or 1)
    async fn delete(&self, collection: &str, filter: &Document) -> StoreResult<u64>;
}
