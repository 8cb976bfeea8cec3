// ── Bike domain type and rental state machine ──
//
// The press transition table is the single externally driven mutation.
// Loop-driven transitions (expiry warning, canceled self-heal) live in
// the reconcile tick, not here.

use serde::{Deserialize, Serialize};
use strum::Display;

pub const MS_PER_MINUTE: i64 = 60_000;

/// Grace window after rental start during which a press counts as a
/// cancellation rather than a close.
pub(crate) const CANCEL_GRACE_MS: i64 = 60_000;

/// Out-of-band `remaining_ms` value written by press-driven closes.
/// The reconcile tick rewrites it to `0` once the closed state has been
/// observable for one tick.
pub(crate) const JUST_CLOSED_MS: i64 = 1;

/// Fixed presentation palette assigned at fleet bootstrap (ARGB).
pub(crate) const BIKE_COLORS: [u32; 11] = [
    0xFF9A_D2AE,
    0xFFF8_A98E,
    0xFFFC_D2C0,
    0xFFF5_ADCE,
    0xFFCB_90AC,
    0xFFF0_5972,
    0xFFF3_8480,
    0xFF00_AEEF,
    0xFFC6_56A0,
    0xFFFE_CA0A,
    0xFF00_A54F,
];

// ── Status ───────────────────────────────────────────────────────────

/// Rental status of a single bike.
///
/// `Canceled` is transient: the reconcile loop reverts it to `Idle` on
/// the next tick, so it is never observable for longer than one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeStatus {
    Idle,
    Active,
    WaitForCancel,
    Canceled,
}

impl BikeStatus {
    /// Human-readable label for reports and notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Available",
            Self::Active => "Rented",
            Self::WaitForCancel => "Awaiting return",
            Self::Canceled => "Cancelled",
        }
    }
}

// ── Press outcome ────────────────────────────────────────────────────

/// What a press did, for the notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Rented,
    Cancelled,
    Closed,
}

impl PressOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Rented => "rented",
            Self::Cancelled => "rental cancelled",
            Self::Closed => "rental closed",
        }
    }
}

// ── Bike ─────────────────────────────────────────────────────────────

/// One rentable unit, identified by an id assigned once at bootstrap.
///
/// `start_time` is meaningful only while the bike is engaged
/// (`Active` or `WaitForCancel`); it is not zeroed when a rental closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bike {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub rent_duration_min: i64,
    pub status: BikeStatus,
    /// Rental start, ms since epoch; `0` before the first rental.
    pub start_time: i64,
    /// Time left in the current rental, recomputed every tick.
    pub remaining_ms: i64,
    /// Presentation tag only.
    pub color: u32,
}

impl Bike {
    pub fn rent_duration_ms(&self) -> i64 {
        self.rent_duration_min * MS_PER_MINUTE
    }

    /// Whether a rental period is currently running.
    pub fn is_engaged(&self) -> bool {
        matches!(self.status, BikeStatus::Active | BikeStatus::WaitForCancel)
    }

    /// Time left at `now_ms`, unclamped.
    pub fn remaining_at(&self, now_ms: i64) -> i64 {
        self.start_time + self.rent_duration_ms() - now_ms
    }

    /// Apply one press transition at `now_ms`.
    ///
    /// Total over all four states; the loop-driven transitions
    /// (`Active -> WaitForCancel`, `Canceled -> Idle`) are not reachable
    /// from here.
    pub fn press(&mut self, now_ms: i64) -> PressOutcome {
        match self.status {
            BikeStatus::Idle => {
                self.start_time = now_ms;
                self.remaining_ms = self.rent_duration_ms();
                self.status = BikeStatus::Active;
                PressOutcome::Rented
            }
            BikeStatus::Active => {
                if now_ms - self.start_time < CANCEL_GRACE_MS {
                    self.remaining_ms = JUST_CLOSED_MS;
                    self.status = BikeStatus::Canceled;
                    PressOutcome::Cancelled
                } else {
                    self.remaining_ms = JUST_CLOSED_MS;
                    self.status = BikeStatus::Idle;
                    PressOutcome::Closed
                }
            }
            BikeStatus::WaitForCancel => {
                self.remaining_ms = JUST_CLOSED_MS;
                self.status = BikeStatus::Idle;
                PressOutcome::Closed
            }
            BikeStatus::Canceled => {
                self.start_time = now_ms;
                self.remaining_ms = self.rent_duration_ms();
                self.status = BikeStatus::Active;
                PressOutcome::Rented
            }
        }
    }
}
