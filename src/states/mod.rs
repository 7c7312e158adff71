//! State query module

mod queries;

pub use queries::{StateQueries, CODE, NAME};
