use std::{fs::OpenOptions, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, error::Result};

/// Installs the global subscriber. The terminal owns stdout, so events are
/// appended to `log_file` instead.
pub fn init(config: &AppConfig) -> Result<()> {
    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "budgetview_tui={level},budgetview={level}",
            level = config.log_level
        )),
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .init();

    Ok(())
}
