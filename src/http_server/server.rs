//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cities::CityQueries;
use crate::states::StateQueries;
use crate::store::DocumentStore;

use super::city_routes::city_routes;
use super::config::HttpServerConfig;
use super::meta_routes::{meta_routes, MetaState};
use super::state_routes::state_routes;

/// Route templates served by `build_router`; keep in sync with the route
/// files. Served verbatim by `/endpoints`.
const REGISTERED_ROUTES: &[&str] = &[
    "/cities",
    "/cities/read",
    "/cities/{id}",
    "/endpoints",
    "/health/db",
    "/hello",
    "/state/read",
    "/state/{code}",
];

/// HTTP server for the city/state API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(HttpServerConfig::default(), store)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Arc<dyn DocumentStore>) -> Router {
        let cities = Arc::new(CityQueries::new(store.clone()));
        let states = Arc::new(StateQueries::new());
        let meta = Arc::new(MetaState {
            store,
            routes: REGISTERED_ROUTES.iter().map(|s| s.to_string()).collect(),
        });

        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            // If no origins configured, allow everything
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(meta_routes(meta))
            .merge(city_routes(cities))
            .merge(state_routes(states))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        info!(%addr, "starting HTTP server");
        info!("health check: http://{}/health/db", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
