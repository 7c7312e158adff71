//! City query module

mod queries;

pub use queries::{CityQueries, CITY_COLLECTION, ID, NAME, STATE_CODE};
