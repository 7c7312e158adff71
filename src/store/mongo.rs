//! MongoDB-backed store adapter
//!
//! Owns the single process-wide connection handle. The handle is
//! established lazily on the first operation and memoized; connection
//! validation (an admin ping) happens on that first attempt only, and a
//! failed attempt is not memoized, so the next operation retries.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, IndexModel};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::backend::{Document, DocumentStore};
use super::config::StoreConfig;
use super::error::{StoreError, StoreResult};

/// Field the store assigns to every persisted document
const STORE_ID: &str = "_id";

/// How long the driver may search for a reachable server
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

const APP_NAME: &str = "citystore";

/// Document store adapter over a MongoDB deployment
pub struct MongoStore {
    config: StoreConfig,
    client: OnceCell<Client>,
}

impl MongoStore {
    /// Create an adapter; no connection is attempted until the first
    /// operation.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Create an adapter from environment-driven configuration
    pub fn from_env() -> StoreResult<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    /// Idempotently establish and memoize the connection handle.
    ///
    /// The first successful call validates the connection with an admin
    /// ping; subsequent calls reuse the handle without re-validating.
    async fn connect(&self) -> StoreResult<&Client> {
        self.client
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.config.uri).await?;
                options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
                options.app_name = Some(APP_NAME.to_string());

                let client = Client::with_options(options)?;
                client.database("admin").run_command(doc! {"ping": 1}).await?;

                info!(database = %self.config.database, "connected to the document store");
                Ok(client)
            })
            .await
    }

    fn collection(&self, client: &Client, name: &str) -> Collection<BsonDocument> {
        client.database(&self.config.database).collection(name)
    }

    /// Ensure a non-unique index on `field`.
    ///
    /// Callers treat a failure as non-fatal so the process can start while
    /// the store is down; the index is created once the store comes back
    /// and this runs again.
    pub async fn ensure_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let client = self.connect().await?;
        let mut keys = BsonDocument::new();
        keys.insert(field, 1);
        let index = IndexModel::builder().keys(keys).build();
        self.collection(client, collection).create_index(index).await?;
        Ok(())
    }
}

/// Encode a JSON document for the wire
fn to_bson(doc: &Document) -> StoreResult<BsonDocument> {
    mongodb::bson::to_document(doc).map_err(|e| StoreError::encoding(e.to_string()))
}

/// Decode a stored document, stripping the store-internal identifier
fn from_bson(mut doc: BsonDocument) -> StoreResult<Document> {
    doc.remove(STORE_ID);
    let value = serde_json::to_value(&doc).map_err(|e| StoreError::encoding(e.to_string()))?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::encoding("stored document is not an object")),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> bool {
        match self.connect().await {
            Ok(client) => client
                .database("admin")
                .run_command(doc! {"ping": 1})
                .await
                .is_ok(),
            Err(_) => false,
        }
    }

    async fn create(&self, collection: &str, doc: &Document) -> StoreResult<()> {
        let client = self.connect().await?;
        debug!(collection, document = %serde_json::Value::Object(doc.clone()), "inserting document");
        self.collection(client, collection)
            .insert_one(to_bson(doc)?)
            .await?;
        Ok(())
    }

    async fn read(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let client = self.connect().await?;
        let mut cursor = self.collection(client, collection).find(doc! {}).await?;

        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            docs.push(from_bson(doc)?);
        }
        Ok(docs)
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Document,
        fields: &Document,
    ) -> StoreResult<u64> {
        let client = self.connect().await?;
        let result = self
            .collection(client, collection)
            .update_one(to_bson(filter)?, doc! { "$set": to_bson(fields)? })
            .await?;
        Ok(result.matched_count)
    }

    async fn delete(&self, collection: &str, filter: &Document) -> StoreResult<u64> {
        let client = self.connect().await?;
        debug!(collection, filter = %serde_json::Value::Object(filter.clone()), "deleting document");
        let result = self
            .collection(client, collection)
            .delete_one(to_bson(filter)?)
            .await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_bson_round_trip_strips_store_id() {
        let json_doc = json!({"_id": "abc123", "name": "Reno", "state_code": "NV"});
        let bson_doc = to_bson(json_doc.as_object().unwrap()).unwrap();

        let decoded = from_bson(bson_doc).unwrap();
        assert!(decoded.get(STORE_ID).is_none());
        assert_eq!(decoded["name"], "Reno");
        assert_eq!(decoded["state_code"], "NV");
    }

    #[test]
    fn test_store_is_lazy() {
        // Constructing an adapter must not touch the network.
        let store = MongoStore::new(StoreConfig::default());
        assert!(store.client.get().is_none());
    }
}
