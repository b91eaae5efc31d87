//! sqlc-gen-safe-enum
//!
//! A sqlc process plugin (`format: json`) that sits in front of a real code
//! generator:
//!
//! - reads a `GenerateRequest` from stdin
//! - rewrites `safe.enum('Type', 'Value')` to `'Value'` after checking the catalog
//! - on any invalid reference, reports all of them and exits without generating
//! - otherwise forwards the rewritten request and relays the generator's response
//!
//! ```yaml
//! plugins:
//!   - name: safe-go
//!     env: [SAFE_ENUM_GENERATOR]
//!     process:
//!       cmd: sqlc-gen-safe-enum
//!       format: json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use safe_enum_check::check_then_generate;
use safe_enum_logging::{init_logging, LogConfig};
use safe_enum_protocol::{read_request, write_response, GenerateRequest, GenerateResponse};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

mod config;

use config::{Cli, PluginConfig};

/// Exit status sqlc plugins use for generation failures.
const FAILURE_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "sqlc-gen-safe-enum",
        verbose: cli.verbose,
        log_file: cli.log_file.clone(),
    }) {
        eprintln!("Warning: {:#}", err);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error generating code: {:#}", err);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = PluginConfig::from_cli(cli)?;
    debug!(method = %config.method, generator = %config.generator_name, "plugin configured");

    let request = read_input(cli.input.as_deref())?;
    info!(
        queries = request.queries.len(),
        schemas = request.schemas().len(),
        "received GenerateRequest"
    );

    let response = check_then_generate(request, config.generator.as_ref())?;
    info!(files = response.files.len(), "generation complete");

    write_output(cli.output.as_deref(), &response, cli.pretty)
}

fn read_input(path: Option<&Path>) -> Result<GenerateRequest> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open request file: {}", path.display()))?;
            read_request(BufReader::new(file))
                .with_context(|| format!("Failed to read request from {}", path.display()))
        }
        None => read_request(io::stdin().lock()).context("Failed to read request from stdin"),
    }
}

fn write_output(path: Option<&Path>, response: &GenerateResponse, pretty: bool) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create response file: {}", path.display()))?;
            write_response(BufWriter::new(file), response, pretty)
                .with_context(|| format!("Failed to write response to {}", path.display()))
        }
        None => write_response(io::stdout().lock(), response, pretty)
            .context("Failed to write response to stdout"),
    }
}
