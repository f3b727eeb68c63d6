//! JSON I/O handling for CLI
//!
//! - Input: one request object per line on stdin
//! - Output: one response object per line on stdout
//! - UTF-8 only

use std::io::{BufRead, Write};

use crate::api::{ApiError, ApiRequest, ApiResponse};

use super::errors::{CliError, CliResult};

/// Read a single request line from `reader`.
pub fn read_request<R: BufRead>(reader: &mut R) -> CliResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }
    Ok(line)
}

/// Iterate over non-blank request lines.
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<String>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(Ok(line)),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Decode one request line.
///
/// A line that is not a request object still gets an envelope.
pub fn parse_request(line: &str) -> Result<ApiRequest, ApiResponse> {
    serde_json::from_str(line).map_err(|e| {
        ApiResponse::error(
            &ApiError::invalid_request("Invalid request event").with_cause(e),
        )
    })
}

/// Write one response line to `writer`.
pub fn write_response<W: Write>(writer: &mut W, response: &ApiResponse) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
