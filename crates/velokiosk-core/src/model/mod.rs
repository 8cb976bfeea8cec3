// ── Domain model ──
//
// Canonical types for the rental fleet: the bike itself, its status
// machine, and the append-only status-change record.

pub mod bike;
pub mod history;

pub use bike::{Bike, BikeStatus, PressOutcome, MS_PER_MINUTE};
pub use history::{StatusChange, describe_transition, transition_label};
