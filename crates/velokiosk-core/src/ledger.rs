// ── History ledger and report builder ──
//
// Append-only record of every observed status change, persisted as one
// JSON document. Appends run under the ledger mutex so two observers of
// the same transition can never insert a duplicate event.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{Bike, BikeStatus, StatusChange, describe_transition};
use crate::store::BlobStore;
use crate::timefmt::{format_clock, format_span};

pub(crate) const HISTORY_KEY: &str = "status_history";

/// Trailing window the report builder reads.
const REPORT_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

pub struct HistoryLedger {
    blobs: Arc<BlobStore>,
    changes: Mutex<Vec<StatusChange>>,
    recovered: bool,
}

impl HistoryLedger {
    /// Load the persisted history. A document that no longer parses is
    /// dropped (the ledger restarts empty) and the loss is reported via
    /// [`recovered_from_corruption`](Self::recovered_from_corruption).
    pub fn open(blobs: Arc<BlobStore>) -> Result<Self, CoreError> {
        let (changes, recovered) = match blobs.read(HISTORY_KEY)? {
            None => (Vec::new(), false),
            Some(json) => match serde_json::from_str::<Vec<StatusChange>>(&json) {
                Ok(changes) => (changes, false),
                Err(e) => {
                    warn!(error = %e, "status history is corrupt, restarting empty");
                    (Vec::new(), true)
                }
            },
        };

        Ok(Self {
            blobs,
            changes: Mutex::new(changes),
            recovered,
        })
    }

    /// Append a change event for `bike` unless its status matches the
    /// last recorded `to_status` for that bike. Returns the new event,
    /// or `None` when nothing changed -- calling this repeatedly with an
    /// unchanged bike appends exactly once.
    pub async fn record_if_changed(
        &self,
        bike: &Bike,
        now_ms: i64,
    ) -> Result<Option<StatusChange>, CoreError> {
        let mut changes = self.changes.lock().await;

        let last_to = changes
            .iter()
            .rev()
            .find(|c| c.bike_id == bike.id)
            .map(|c| c.to_status);
        if last_to == Some(bike.status) {
            return Ok(None);
        }

        let change = StatusChange {
            bike_id: bike.id,
            bike_name: bike.name.clone(),
            timestamp: now_ms,
            from_status: last_to.unwrap_or(BikeStatus::Idle),
            to_status: bike.status,
        };
        changes.push(change.clone());
        self.persist(&changes)?;
        Ok(Some(change))
    }

    /// Last recorded change for one bike.
    pub async fn last_change_for(&self, bike_id: u32) -> Option<StatusChange> {
        self.changes
            .lock()
            .await
            .iter()
            .rev()
            .find(|c| c.bike_id == bike_id)
            .cloned()
    }

    /// All changes with `timestamp >= since_ms`, in insertion order.
    pub async fn changes_within(&self, since_ms: i64) -> Vec<StatusChange> {
        self.changes
            .lock()
            .await
            .iter()
            .filter(|c| c.timestamp >= since_ms)
            .cloned()
            .collect()
    }

    pub async fn change_count(&self) -> usize {
        self.changes.lock().await.len()
    }

    /// Whether [`open`](Self::open) had to discard a corrupt document.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    /// Build the 24-hour audit report.
    ///
    /// Per bike, walk its trailing-window events chronologically; every
    /// event that ends an occupied interval (`to_status != Active`) and
    /// has a predecessor in the walk becomes one row. Rows across all
    /// bikes come back globally ordered by event time.
    pub async fn daily_report(&self, now_ms: i64) -> Vec<Vec<String>> {
        let changes = self.changes.lock().await;
        let cutoff = now_ms - REPORT_WINDOW_MS;

        let mut per_bike: BTreeMap<u32, Vec<&StatusChange>> = BTreeMap::new();
        for change in changes.iter().filter(|c| c.timestamp >= cutoff) {
            per_bike.entry(change.bike_id).or_default().push(change);
        }

        let mut keyed: Vec<(i64, Vec<String>)> = Vec::new();
        for events in per_bike.values() {
            for pair in events.windows(2) {
                let (prev, cur) = (pair[0], pair[1]);
                if cur.to_status == BikeStatus::Active {
                    continue;
                }
                keyed.push((
                    cur.timestamp,
                    vec![
                        cur.bike_name.clone(),
                        format!(
                            "from {} {}",
                            prev.to_status.label(),
                            format_clock(prev.timestamp)
                        ),
                        format!("to {} {}", cur.to_status.label(), format_clock(cur.timestamp)),
                        describe_transition(cur.from_status, cur.to_status),
                        format_span(cur.timestamp - prev.timestamp),
                    ],
                ));
            }
        }

        keyed.sort_by_key(|(ts, _)| *ts);
        keyed.into_iter().map(|(_, row)| row).collect()
    }

    fn persist(&self, changes: &[StatusChange]) -> Result<(), CoreError> {
        let json = serde_json::to_string(changes).map_err(|e| CoreError::Store {
            message: e.to_string(),
        })?;
        self.blobs.write(HISTORY_KEY, &json)
    }
}
