//! Command line and environment configuration.
//!
//! sqlc starts process plugins as `<cmd> <method>` with no room for flags, so
//! every option can also come from an environment variable listed in the
//! plugin's `env` block of `sqlc.yaml`.

use anyhow::{Context, Result};
use clap::Parser;
use safe_enum_check::{CheckOnlyGenerator, Generator, ProcessGenerator};
use safe_enum_protocol::{RpcMethod, GENERATE_METHOD};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sqlc-gen-safe-enum",
    version,
    about = "Validate safe.enum('Type', 'Value') references, then run the real generator"
)]
pub struct Cli {
    /// RPC method (sqlc passes /plugin.CodegenService/Generate)
    #[arg(default_value = GENERATE_METHOD)]
    pub method: String,

    /// Downstream sqlc process plugin that generates the code
    #[arg(long, env = "SAFE_ENUM_GENERATOR")]
    pub generator: Option<PathBuf>,

    /// Extra argument for the downstream generator (repeatable)
    #[arg(long = "generator-arg", allow_hyphen_values = true)]
    pub generator_args: Vec<String>,

    /// Validate and rewrite only; respond with no files
    #[arg(long, env = "SAFE_ENUM_CHECK_ONLY")]
    pub check_only: bool,

    /// Read the GenerateRequest from a file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the GenerateResponse to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging (stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Also append logs to this file
    #[arg(long, env = "SAFE_ENUM_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Settings resolved from [`Cli`] before any input is read.
pub struct PluginConfig {
    pub method: RpcMethod,
    pub generator: Box<dyn Generator>,
    pub generator_name: String,
}

impl PluginConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let method: RpcMethod = cli
            .method
            .parse()
            .context("Unsupported plugin invocation")?;

        // --check-only wins over a generator inherited from the environment
        let (generator, generator_name): (Box<dyn Generator>, String) = if cli.check_only {
            (Box::new(CheckOnlyGenerator), "check-only".to_string())
        } else if let Some(program) = &cli.generator {
            let generator = ProcessGenerator::new(program)
                .with_args(cli.generator_args.iter().cloned())
                .with_method(method);
            (Box::new(generator), program.display().to_string())
        } else {
            anyhow::bail!(
                "No downstream generator configured. \
                 Set SAFE_ENUM_GENERATOR (or --generator) to a sqlc process plugin, \
                 or SAFE_ENUM_CHECK_ONLY=true (or --check-only) to validate only"
            );
        };

        Ok(Self {
            method,
            generator,
            generator_name,
        })
    }
}
