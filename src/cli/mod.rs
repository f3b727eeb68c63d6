//! CLI module for the store API
//!
//! Provides command-line interface for:
//! - invoke: handle one request from stdin
//! - batch: handle one request per stdin line
//! - serve: HTTP server

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, StoreArgs};
pub use commands::{batch, build_api, invoke, request_line, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, read_requests, write_response};
