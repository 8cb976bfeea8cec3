// ── Status-change record and transition labels ──

use serde::{Deserialize, Serialize};

use super::bike::BikeStatus;

/// One append-only entry in the history ledger.
///
/// Never mutated after insertion; insertion order within a bike's
/// history is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub bike_id: u32,
    pub bike_name: String,
    /// ms since epoch.
    pub timestamp: i64,
    pub from_status: BikeStatus,
    pub to_status: BikeStatus,
}

// ── Transition labels ────────────────────────────────────────────────
//
// Reporting only, not an operational invariant. Kept as data so a new
// state means a table edit, not new branching.

const TRANSITION_LABELS: &[(BikeStatus, BikeStatus, &str)] = &[
    (BikeStatus::Idle, BikeStatus::Active, "Rented"),
    (BikeStatus::Canceled, BikeStatus::Active, "Rented again"),
    (BikeStatus::Active, BikeStatus::Canceled, "Cancelled"),
    (BikeStatus::Active, BikeStatus::Idle, "Closed"),
    (BikeStatus::Active, BikeStatus::WaitForCancel, "Rent expired"),
    (BikeStatus::WaitForCancel, BikeStatus::Idle, "Closed after expiry"),
    (BikeStatus::Canceled, BikeStatus::Idle, "Cancellation cleared"),
];

/// Look up the human label for a `(from, to)` transition.
pub fn transition_label(from: BikeStatus, to: BikeStatus) -> Option<&'static str> {
    TRANSITION_LABELS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, label)| *label)
}

/// Label for a transition, falling back to a composed description for
/// pairs outside the table.
pub fn describe_transition(from: BikeStatus, to: BikeStatus) -> String {
    transition_label(from, to)
        .map_or_else(|| format!("{} to {}", from.label(), to.label()), String::from)
}
