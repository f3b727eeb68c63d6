//! CLI argument definitions using clap
//!
//! Commands:
//! - store-api invoke [--table <name>] [--data-dir <path> | --in-memory]
//! - store-api batch  [--table <name>] [--data-dir <path> | --in-memory]
//! - store-api serve  [--table <name>] [--data-dir <path> | --in-memory] [--host] [--port]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::TABLE_NAME_VAR;

/// Store API - CRUD over store records
#[derive(Parser, Debug)]
#[command(name = "store-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where store records live.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StoreArgs {
    /// Table holding store records
    #[arg(long, env = TABLE_NAME_VAR)]
    pub table: Option<String>,

    /// Directory for file-backed tables
    #[arg(long, default_value = "./store-data")]
    pub data_dir: PathBuf,

    /// Keep tables in memory for the life of the process
    #[arg(long, conflicts_with = "data_dir")]
    pub in_memory: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Handle a single request read from stdin and exit
    Invoke {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Handle one request per stdin line until EOF
    Batch {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Serve the API over HTTP
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
