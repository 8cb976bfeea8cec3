//! Rental core for a fixed-fleet bike kiosk.
//!
//! This crate owns the rental state machine, the timer-driven
//! reconciliation loop, and the status-change history ledger:
//!
//! - **[`Kiosk`]** -- Process-scoped facade managing the full lifecycle:
//!   [`start()`](Kiosk::start) loads the persisted fleet and spawns the
//!   background tasks (reconcile loop, press processor);
//!   [`press()`](Kiosk::press) is the fire-and-forget operation that
//!   advances one bike through the state table.
//!
//! - **[`FleetStore`]** -- Durable whole-snapshot storage behind a single
//!   mutex. Every mutation path runs load-modify-save under that one
//!   lock, so a press can never race a tick's full-snapshot write.
//!
//! - **[`HistoryLedger`]** -- Append-only status-change record with the
//!   deduplicating [`record_if_changed`](HistoryLedger::record_if_changed)
//!   and the 24-hour [`daily_report`](HistoryLedger::daily_report)
//!   builder.
//!
//! - **[`SyncGateway`]** -- Contract for the external spreadsheet-style
//!   ledger. The loop prepares tabular rows and dispatches them on
//!   detached tasks; a failed sync is reported and backed off, never
//!   fatal.
//!
//! - **Observer channels** -- a `watch` stream of fleet snapshots and a
//!   `broadcast` stream of [`AppEvent`] notices for UI/CLI consumers.

pub mod config;
pub mod error;
pub mod kiosk;
pub mod ledger;
pub mod model;
pub mod store;
pub mod sync;
pub mod timefmt;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{FleetDefaults, KioskConfig, SyncSettings};
pub use error::CoreError;
pub use kiosk::{AppEvent, Kiosk};
pub use ledger::HistoryLedger;
pub use model::{Bike, BikeStatus, PressOutcome, StatusChange};
pub use store::{BlobStore, FleetStore};
pub use sync::{SyncError, SyncErrorCode, SyncGateway};
