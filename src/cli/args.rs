//! CLI argument definitions using clap
//!
//! Commands:
//! - citystore serve [--host <host>] [--port <port>]
//! - citystore ping

use clap::{Parser, Subcommand};

/// citystore - a REST backend for city and state records
#[derive(Parser, Debug)]
#[command(name = "citystore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Check document store connectivity and exit
    Ping,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
