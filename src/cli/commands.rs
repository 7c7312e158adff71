//! CLI command implementations
//!
//! The runtime is created here; `main` and the arg parser stay synchronous.

use std::sync::Arc;

use tracing::warn;

use crate::cities::{CITY_COLLECTION, NAME};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::{DocumentStore, MongoStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { host, port } => serve(host, port),
        Command::Ping => ping(),
    }
}

/// Boot the store adapter and run the HTTP server.
pub fn serve(host: String, port: u16) -> CliResult<()> {
    let store = MongoStore::from_env().map_err(|e| CliError::config_error(e.to_string()))?;

    let rt = build_runtime()?;
    rt.block_on(async {
        // Index creation is non-fatal: the server starts even while the
        // store is down, and the index lands on a later boot.
        if let Err(err) = store.ensure_index(CITY_COLLECTION, NAME).await {
            warn!(error = %err, "could not ensure store indexes");
        }

        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let config = HttpServerConfig {
            host,
            port,
            ..Default::default()
        };
        let server = HttpServer::with_config(config, store);
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {e}")))
    })
}

/// One-shot store connectivity probe.
pub fn ping() -> CliResult<()> {
    let store = MongoStore::from_env().map_err(|e| CliError::config_error(e.to_string()))?;

    let rt = build_runtime()?;
    if rt.block_on(store.ping()) {
        println!("store reachable");
        Ok(())
    } else {
        Err(CliError::store_unreachable(
            "store did not answer the ping",
        ))
    }
}

fn build_runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {e}")))
}
