//! Configuration loading for velokiosk.
//!
//! Layered figment resolution: compiled defaults, then the TOML config
//! file, then `VELOKIOSK_*` environment variables (nested keys split on
//! `__`, e.g. `VELOKIOSK_SYNC__HOLDOFF_TICKS`). The file-facing
//! [`FileConfig`] keeps durations as plain millisecond integers;
//! [`FileConfig::resolve`] turns it into the core's runtime
//! [`KioskConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use velokiosk_core::KioskConfig;

const ENV_PREFIX: &str = "VELOKIOSK_";
const CONFIG_FILE: &str = "velokiosk.toml";

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("Failed to write configuration: {message}")]
    Write { message: String },
}

// ── File-facing types ────────────────────────────────────────────────

/// Sync section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSyncConfig {
    pub holdoff_ticks: u32,
    pub backoff_ms: u64,
    pub activity_range: String,
    pub report_range: String,
}

impl Default for FileSyncConfig {
    fn default() -> Self {
        let defaults = velokiosk_core::SyncSettings::default();
        Self {
            holdoff_ticks: defaults.holdoff_ticks,
            backoff_ms: u64::try_from(defaults.backoff.as_millis()).unwrap_or(10_000),
            activity_range: defaults.activity_range,
            report_range: defaults.report_range,
        }
    }
}

/// The on-disk configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Data directory; defaults to the platform data dir when absent.
    pub data_dir: Option<PathBuf>,
    pub fleet_size: u32,
    pub default_price: String,
    pub rent_duration_min: i64,
    pub tick_interval_ms: u64,
    pub early_warning_ms: i64,
    pub sync: FileSyncConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        let fleet = velokiosk_core::FleetDefaults::default();
        Self {
            data_dir: None,
            fleet_size: fleet.size,
            default_price: fleet.price,
            rent_duration_min: fleet.rent_duration_min,
            tick_interval_ms: 1_000,
            early_warning_ms: 5 * velokiosk_core::model::MS_PER_MINUTE,
            sync: FileSyncConfig::default(),
        }
    }
}

impl FileConfig {
    /// Translate into the core's runtime configuration.
    pub fn resolve(&self) -> KioskConfig {
        let data_dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        let mut cfg = KioskConfig::new(data_dir);
        cfg.fleet.size = self.fleet_size;
        cfg.fleet.price = self.default_price.clone();
        cfg.fleet.rent_duration_min = self.rent_duration_min;
        cfg.tick_interval = Duration::from_millis(self.tick_interval_ms);
        cfg.early_warning_ms = self.early_warning_ms;
        cfg.sync.holdoff_ticks = self.sync.holdoff_ticks;
        cfg.sync.backoff = Duration::from_millis(self.sync.backoff_ms);
        cfg.sync.activity_range = self.sync.activity_range.clone();
        cfg.sync.report_range = self.sync.report_range.clone();
        cfg
    }
}

// ── Loading / saving ─────────────────────────────────────────────────

/// Platform config file location, falling back to the working directory
/// when no home is available.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "velokiosk").map_or_else(
        || PathBuf::from(CONFIG_FILE),
        |dirs| dirs.config_dir().join(CONFIG_FILE),
    )
}

/// Platform data directory used when the config names none.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "velokiosk").map_or_else(
        || PathBuf::from("velokiosk-data"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Load configuration: defaults < TOML file < environment.
///
/// A missing file is not an error; the defaults simply pass through.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config = Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Write `config` as pretty TOML, creating parent directories.
pub fn save_config(config: &FileConfig, path: &Path) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config).map_err(|e| ConfigError::Write {
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            message: e.to_string(),
        })?;
    }
    std::fs::write(path, rendered).map_err(|e| ConfigError::Write {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_a_valid_kiosk_config() {
        let resolved = FileConfig::default().resolve();
        assert!(resolved.validate().is_ok());
        assert_eq!(resolved.fleet.size, 24);
        assert_eq!(resolved.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn file_values_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "velokiosk.toml",
                r#"
                    fleet_size = 6
                    rent_duration_min = 30

                    [sync]
                    holdoff_ticks = 5
                    activity_range = "Now!A1:D"
                "#,
            )?;

            let config = load_config(Some(Path::new("velokiosk.toml"))).unwrap();
            assert_eq!(config.fleet_size, 6);
            assert_eq!(config.rent_duration_min, 30);
            assert_eq!(config.sync.holdoff_ticks, 5);
            assert_eq!(config.sync.activity_range, "Now!A1:D");
            // Untouched keys keep their defaults.
            assert_eq!(config.tick_interval_ms, 1_000);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("velokiosk.toml", "fleet_size = 6")?;
            jail.set_env("VELOKIOSK_FLEET_SIZE", "12");
            jail.set_env("VELOKIOSK_SYNC__HOLDOFF_TICKS", "7");

            let config = load_config(Some(Path::new("velokiosk.toml"))).unwrap();
            assert_eq!(config.fleet_size, 12);
            assert_eq!(config.sync.holdoff_ticks, 7);
            Ok(())
        });
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("velokiosk.toml");

        let config = FileConfig {
            fleet_size: 8,
            sync: FileSyncConfig {
                report_range: "Audit!A2:E".into(),
                ..FileSyncConfig::default()
            },
            ..FileConfig::default()
        };
        save_config(&config, &path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.fleet_size, 8);
        assert_eq!(loaded.sync.report_range, "Audit!A2:E");
    }
}
