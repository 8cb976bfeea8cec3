// ── Core error types ──
//
// User-facing errors from velokiosk-core. Consumers never see raw io or
// JSON parse failures; store-layer errors are wrapped with the blob key
// they belong to, and gateway failures keep their typed `SyncError`.

use thiserror::Error;

use crate::sync::SyncError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Controller errors ────────────────────────────────────────────
    #[error("Bike not found: {id}")]
    BikeNotFound { id: u32 },

    #[error("Kiosk is not running")]
    NotRunning,

    #[error("Press queue is full")]
    PressQueueFull,

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Persisted data for '{key}' is corrupt: {message}")]
    CorruptBlob { key: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── External ledger errors ───────────────────────────────────────
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Store {
            message: err.to_string(),
        }
    }
}
