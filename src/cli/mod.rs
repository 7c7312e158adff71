//! CLI module for citystore
//!
//! Provides command-line interface for:
//! - serve: boot the HTTP API server
//! - ping: one-shot store connectivity probe

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{ping, run_command, serve};
pub use errors::{CliError, CliResult};

use tracing_subscriber::EnvFilter;

/// Parse arguments and dispatch to the selected command
pub fn run() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse_args();
    run_command(cli.command)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("citystore=info,tower_http=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
