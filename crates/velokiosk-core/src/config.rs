// ── Runtime kiosk configuration ──
//
// These types describe *how* the kiosk runs: fleet bootstrap defaults,
// loop cadence, and sync tuning. They never touch disk -- the config
// crate (or a test) constructs a `KioskConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::model::MS_PER_MINUTE;

/// Values used when synthesizing a fresh fleet on first run.
#[derive(Debug, Clone)]
pub struct FleetDefaults {
    /// Number of kiosk slots. Fixed for the life of the install.
    pub size: u32,
    pub price: String,
    pub rent_duration_min: i64,
}

impl Default for FleetDefaults {
    fn default() -> Self {
        Self {
            size: 24,
            price: "1000тг.".into(),
            rent_duration_min: 60,
        }
    }
}

/// External-ledger sync tuning.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Heartbeat cadence: a sync fires after this many ticks even with
    /// no change in the engaged-bike count.
    pub holdoff_ticks: u32,
    /// Extra sleep after a failed sync before resuming normal cadence.
    pub backoff: Duration,
    /// Sheet range receiving the current-activity view.
    pub activity_range: String,
    /// Sheet range receiving the 24-hour audit report.
    pub report_range: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            holdoff_ticks: 30,
            backoff: Duration::from_secs(10),
            activity_range: "Current!A2:D".into(),
            report_range: "History!A2:E".into(),
        }
    }
}

/// Full runtime configuration for a [`Kiosk`](crate::Kiosk).
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Directory holding the persisted fleet and history blobs.
    pub data_dir: PathBuf,
    pub fleet: FleetDefaults,
    /// Reconcile loop cadence.
    pub tick_interval: Duration,
    /// Remaining-time threshold at which an active rental flips to
    /// `WaitForCancel` (the pre-expiry alert window).
    pub early_warning_ms: i64,
    pub sync: SyncSettings,
}

impl KioskConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            fleet: FleetDefaults::default(),
            tick_interval: Duration::from_secs(1),
            early_warning_ms: 5 * MS_PER_MINUTE,
            sync: SyncSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.fleet.size == 0 {
            return Err(CoreError::Config {
                message: "fleet size must be at least 1".into(),
            });
        }
        if self.fleet.rent_duration_min <= 0 {
            return Err(CoreError::Config {
                message: "rent duration must be positive".into(),
            });
        }
        if self.tick_interval.is_zero() {
            return Err(CoreError::Config {
                message: "tick interval must be non-zero".into(),
            });
        }
        if self.sync.holdoff_ticks == 0 {
            return Err(CoreError::Config {
                message: "sync holdoff must be at least 1 tick".into(),
            });
        }
        Ok(())
    }
}
