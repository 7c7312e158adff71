//! End-to-end workflow over the query modules with an in-memory store.

use std::sync::Arc;

use serde_json::json;

use citystore::cities::{CityQueries, CITY_COLLECTION, ID};
use citystore::error::QueryError;
use citystore::states::StateQueries;
use citystore::store::MemoryStore;

#[tokio::test]
async fn test_city_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    let queries = CityQueries::new(store.clone());

    // Create returns a usable id and the record is readable through it.
    let id = queries
        .create(&json!({"name": "Springfield", "state_code": "IL"}))
        .await
        .unwrap();
    assert!(CityQueries::is_valid_id(&id));

    let rec = queries.read_one(&id).await.unwrap().unwrap();
    assert_eq!(rec["name"], "Springfield");
    assert_eq!(rec["state_code"], "IL");
    assert_eq!(rec[ID], json!(id.as_str()));

    // The persistent copy was written without the internal id.
    let stored = store.documents(CITY_COLLECTION);
    assert_eq!(stored.len(), 1);
    assert!(stored[0].get(ID).is_none());

    // Patch only the name; the rest of the record is untouched.
    let updated = queries
        .update(&id, &json!({"name": "Shelbyville"}))
        .await
        .unwrap();
    assert_eq!(updated["name"], "Shelbyville");
    assert_eq!(updated["state_code"], "IL");

    // Delete by id, then the record is gone everywhere.
    queries.delete_by_id(&id).await.unwrap();
    assert!(queries.read_one(&id).await.unwrap().is_none());
    assert_eq!(queries.num_cities().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cache_survives_an_outage_after_load() {
    let store = Arc::new(MemoryStore::new());
    let queries = CityQueries::new(store.clone());

    let id = queries
        .create(&json!({"name": "Reno", "state_code": "NV"}))
        .await
        .unwrap();

    // Reads require connectivity even when the cache could answer.
    store.set_available(false);
    assert!(matches!(
        queries.read().await,
        Err(QueryError::ConnectionFailure(_))
    ));

    // Writes keep working against the cache alone.
    let second = queries
        .create(&json!({"name": "Sparks", "state_code": "NV"}))
        .await
        .unwrap();

    store.set_available(true);
    let cities = queries.read().await.unwrap();
    assert!(cities.contains_key(&id));
    assert!(cities.contains_key(&second));

    // Only the first create reached the store.
    assert_eq!(store.documents(CITY_COLLECTION).len(), 1);
}

#[tokio::test]
async fn test_states_are_independent_of_the_store() {
    let states = StateQueries::new();
    states
        .create(&json!({"code": "IL", "name": "Illinois"}))
        .unwrap();
    states
        .create(&json!({"code": "NV", "name": "Nevada"}))
        .unwrap();

    assert_eq!(states.num_states(), 2);
    assert!(StateQueries::is_valid_code("IL"));
    assert!(states.read_one("ZZ").is_none());
}
