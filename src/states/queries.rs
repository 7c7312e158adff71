//! State queries
//!
//! States live only in an in-memory mapping keyed by their 2-letter postal
//! code; there is no persistent backing and no store access in this module.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::store::Document;

pub const CODE: &str = "code";
pub const NAME: &str = "name";

const CODE_LEN: usize = 2;

type StateCache = HashMap<String, Document>;

/// In-memory state mapping (code -> record)
#[derive(Default)]
pub struct StateQueries {
    cache: RwLock<StateCache>,
}

impl StateQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `code` is a valid 2-letter abbreviation
    pub fn is_valid_code(code: &str) -> bool {
        code.len() == CODE_LEN && code.chars().all(|c| c.is_ascii_alphabetic())
    }

    /// Add a state record keyed by its code; last write wins on a
    /// duplicate code. Returns the code.
    pub fn create(&self, fields: &Value) -> QueryResult<String> {
        let rec = fields
            .as_object()
            .ok_or_else(|| QueryError::invalid_argument("expected a JSON object"))?;

        let name = rec.get(NAME).and_then(Value::as_str).unwrap_or("");
        let code = rec.get(CODE).and_then(Value::as_str).unwrap_or("");
        if name.is_empty() || code.is_empty() {
            return Err(QueryError::invalid_argument(
                "state name and code are required",
            ));
        }
        if !Self::is_valid_code(code) {
            return Err(QueryError::invalid_argument(format!(
                "invalid state code: {code}"
            )));
        }

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code.to_string(), rec.clone());
        Ok(code.to_string())
    }

    /// Snapshot of all states (code -> record)
    pub fn read(&self) -> StateCache {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Single state by exact code
    pub fn read_one(&self, code: &str) -> Option<Document> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// Number of states currently stored
    pub fn num_states(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
