//! CLI configuration -- thin wrapper around `velokiosk_config`.
//!
//! Loads the layered file/env configuration and applies CLI flag
//! overrides (--data-dir, --tick-ms) on top.

use std::time::Duration;

use velokiosk_core::KioskConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the runtime configuration: defaults < file < env < flags.
pub fn build_kiosk_config(
    global: &GlobalOpts,
    tick_ms: Option<u64>,
) -> Result<KioskConfig, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(velokiosk_config::config_path);

    let file = velokiosk_config::load_config(Some(&path)).map_err(|e| CliError::Config {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut config = file.resolve();
    if let Some(ref dir) = global.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(ms) = tick_ms {
        config.tick_interval = Duration::from_millis(ms);
    }
    config.validate()?;
    Ok(config)
}
