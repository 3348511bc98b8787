//! Logging setup.
//!
//! All modules log through the `log` facade; this module wires the facade to a
//! `fern` dispatch writing to stdout and, when configured, to a log file.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;

/// Install the global logger described by `config`.
///
/// Calling this more than once fails, as the `log` facade only accepts a
/// single logger per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
    build_dispatch(config)?
        .apply()
        .context("Failed to install logger")?;
    Ok(())
}

/// Build the dispatch without installing it.
pub fn build_dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let level = level_filter(config)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // sqlx logs every statement at info
        .level_for("sqlx", LevelFilter::Warn)
        .level_for("sea_orm", LevelFilter::Warn)
        .chain(std::io::stdout());

    if config.enabled {
        if let Some(path) = &config.file {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(file);
        }
    }

    Ok(dispatch)
}

/// Resolve the effective level; disabled logging maps to `Off`.
pub fn level_filter(config: &LoggingConfig) -> Result<LevelFilter> {
    if !config.enabled {
        return Ok(LevelFilter::Off);
    }
    config
        .level
        .parse::<LevelFilter>()
        .with_context(|| format!("Invalid logging level '{}'", config.level))
}
