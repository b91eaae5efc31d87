//! Shared logging utilities for the safe_enum plugin.
//!
//! stdout carries the plugin response, so console output always goes to stderr.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// The binary's own events are targeted at its bin crate name.
const DEFAULT_LOG_FILTER: &str = "safe_enum=info,safe_enum_check=info,sqlc_gen_safe_enum=info";
const VERBOSE_LOG_FILTER: &str = "safe_enum=debug,safe_enum_check=debug,sqlc_gen_safe_enum=debug";

/// Logging configuration for the plugin binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

/// Initialize tracing with stderr output and an optional append-only log file.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let file_layer = match config.log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(env_filter(config.verbose)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter(config.verbose)),
        )
        .try_init()
        .with_context(|| format!("Failed to initialize logging for {}", config.app_name))?;

    tracing::debug!(app = config.app_name, log_file = ?config.log_file, "logging initialized");
    Ok(())
}

/// `RUST_LOG` wins; otherwise the default (or verbose) filter.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
