//! CLI command implementations
//!
//! `invoke` and `batch` keep stdout for responses and send telemetry to
//! stderr; `serve` logs to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::api::{ApiRequest, ApiResponse, StoreApi};
use crate::config::Settings;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{JsonLineSink, Telemetry};
use crate::persistence::{FileStore, MemoryStore, StorePort};

use super::args::{Cli, Command, StoreArgs};
use super::errors::{CliError, CliResult};
use super::io::{parse_request, read_request, read_requests, write_response};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Invoke { store } => {
            let api = build_api(&store, Telemetry::new(Arc::new(JsonLineSink::stderr())))?;
            invoke(&api, &mut io::stdin().lock(), &mut io::stdout())
        }
        Command::Batch { store } => {
            let api = build_api(&store, Telemetry::new(Arc::new(JsonLineSink::stderr())))?;
            batch(&api, io::stdin().lock(), &mut io::stdout())
        }
        Command::Serve { store, host, port } => {
            let api = build_api(&store, Telemetry::stdout())?;
            serve(api, HttpServerConfig::new(host, port))
        }
    }
}

/// Wire settings, backend and telemetry into a `StoreApi`.
pub fn build_api(
    args: &StoreArgs,
    telemetry: Telemetry,
) -> CliResult<StoreApi<Box<dyn StorePort>>> {
    let settings = Settings::new(args.table.clone());
    let port: Box<dyn StorePort> = if args.in_memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::open(&args.data_dir).map_err(|e| {
            CliError::boot_failed(format!(
                "Failed to open data directory {}: {}",
                args.data_dir.display(),
                e
            ))
        })?)
    };
    Ok(StoreApi::new(settings, port, telemetry))
}

/// Handle exactly one request.
pub fn invoke<P, R, W>(api: &StoreApi<P>, input: &mut R, output: &mut W) -> CliResult<()>
where
    P: StorePort,
    R: BufRead,
    W: Write,
{
    let line = read_request(input)?;
    let response = respond(api, &line);
    write_response(output, &response)
}

/// Handle every request line until EOF.
pub fn batch<P, R, W>(api: &StoreApi<P>, input: R, output: &mut W) -> CliResult<()>
where
    P: StorePort,
    R: BufRead,
    W: Write,
{
    for line in read_requests(input) {
        let response = respond(api, &line?);
        write_response(output, &response)?;
    }
    Ok(())
}

fn respond<P: StorePort>(api: &StoreApi<P>, line: &str) -> ApiResponse {
    match parse_request(line) {
        Ok(request) => api.handle(&request),
        Err(rejected) => rejected,
    }
}

/// Run the HTTP server until it stops.
pub fn serve<P: StorePort + 'static>(api: StoreApi<P>, config: HttpServerConfig) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;
    let server = HttpServer::new(config, api);
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Build a request line for `invoke`/`batch` input.
pub fn request_line(request: &ApiRequest) -> CliResult<String> {
    Ok(serde_json::to_string(request)?)
}
