//! Logging setup
//!
//! The TUI owns the terminal, so interactive sessions log to a file in the
//! config directory. Headless commands log to stderr. The filter comes from
//! `SQLTPL_LOG` and defaults to `info`.

use crate::config::Config;
use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SQLTPL_LOG";
const LOG_FILE: &str = "sqltpl.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to `~/.sqltpl/sqltpl.log`. Returns the log path, or `None` when no
/// home directory is known (logging is then disabled).
pub fn init_file() -> Result<Option<PathBuf>> {
    let Some(dir) = Config::config_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(Some(path))
}

/// Log to stderr
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}
