// ── External-ledger sync contract ──
//
// The spreadsheet client itself lives outside the core; the kiosk only
// prepares tabular rows and hands them to whatever implements
// `SyncGateway`. Failures carry a reason code so callers can distinguish
// throttling from rejection without parsing messages.

use async_trait::async_trait;
use strum::Display;
use thiserror::Error;

use crate::model::Bike;
use crate::timefmt::{format_clock, format_countdown};

// ── Errors ───────────────────────────────────────────────────────────

/// Reason code for a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SyncErrorCode {
    /// The external service could not be reached.
    Unavailable,
    /// The service refused the write.
    Rejected,
    /// The service asked us to slow down.
    RateLimited,
    /// The range string did not name a valid sheet/cell area.
    InvalidRange,
}

/// Typed failure surfaced by every gateway operation.
#[derive(Debug, Clone, Error)]
#[error("sync failed ({code}): {message}")]
pub struct SyncError {
    pub code: SyncErrorCode,
    pub message: String,
}

impl SyncError {
    pub fn new(code: SyncErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// ── Gateway contract ─────────────────────────────────────────────────

/// Consumer of prepared tabular writes.
///
/// `range` is a sheet-name + cell-range string (e.g. `"Current!A2:D"`);
/// rows are sequences of cell strings. All three operations are
/// whole-range: there is no partial-update surface.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Overwrite `range` with `rows`.
    async fn write(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError>;

    /// Append `rows` at the first free row of `range`.
    async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError>;

    /// Clear `range`, then write `rows`.
    async fn clear_and_write(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError>;
}

// ── Row building ─────────────────────────────────────────────────────

/// Build the "current activity" view: one row per engaged bike, in fleet
/// order: `(name, start, end, remaining)`.
pub fn activity_rows(fleet: &[Bike], now_ms: i64) -> Vec<Vec<String>> {
    fleet
        .iter()
        .filter(|b| b.is_engaged())
        .map(|b| {
            vec![
                b.name.clone(),
                format_clock(b.start_time),
                format_clock(b.start_time + b.rent_duration_ms()),
                format_countdown(b.remaining_at(now_ms)),
            ]
        })
        .collect()
}
