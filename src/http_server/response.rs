//! # Response Formatting
//!
//! Standard response types for the HTTP surface.

use serde::Serialize;

/// Collection listing with a record count
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse<T: Serialize> {
    pub data: T,
    pub count: usize,
}

impl<T: Serialize> RecordsResponse<T> {
    pub fn new(data: T, count: usize) -> Self {
        Self { data, count }
    }
}
