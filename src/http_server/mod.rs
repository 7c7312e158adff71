//! # HTTP Server Module
//!
//! Axum-based HTTP surface over the city and state query modules.
//! One file per route group, combined into a unified server.
//!
//! # Endpoints
//!
//! - `/cities*` - City CRUD
//! - `/state*` - State lookups
//! - `/hello`, `/health/db`, `/endpoints` - Liveness and discovery

pub mod city_routes;
pub mod config;
pub mod errors;
pub mod meta_routes;
pub mod response;
pub mod server;
pub mod state_routes;

pub use config::HttpServerConfig;
pub use errors::ErrorResponse;
pub use server::HttpServer;
