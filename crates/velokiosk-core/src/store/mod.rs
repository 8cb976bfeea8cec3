// ── Durable fleet snapshot store ──
//
// Whole-snapshot persistence with an in-memory cache behind a single
// mutex. Every mutation path (press processor, reconcile loop, settings)
// runs load-modify-save under that one lock -- the single-writer
// discipline that keeps a press from racing a tick's full-snapshot
// write.

mod blob;

pub use blob::BlobStore;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::config::FleetDefaults;
use crate::error::CoreError;
use crate::model::bike::BIKE_COLORS;
use crate::model::{Bike, BikeStatus};

pub(crate) const FLEET_KEY: &str = "bikes";

pub struct FleetStore {
    blobs: Arc<BlobStore>,
    fleet: Mutex<Vec<Bike>>,
    recovered: bool,
}

impl FleetStore {
    /// Load the persisted fleet, bootstrapping a fresh one on first run.
    ///
    /// A snapshot that no longer parses is treated as lost: a fresh
    /// fleet is bootstrapped in its place and
    /// [`recovered_from_corruption`](Self::recovered_from_corruption)
    /// reports the data loss. Fatal errors here are io-level only.
    pub fn open(blobs: Arc<BlobStore>, defaults: &FleetDefaults) -> Result<Self, CoreError> {
        let (fleet, recovered) = match blobs.read(FLEET_KEY)? {
            None => {
                info!(size = defaults.size, "no fleet snapshot found, bootstrapping");
                let fleet = bootstrap_fleet(defaults);
                persist_fleet(&blobs, &fleet)?;
                (fleet, false)
            }
            Some(json) => match serde_json::from_str::<Vec<Bike>>(&json) {
                Ok(fleet) => (fleet, false),
                Err(e) => {
                    warn!(error = %e, "fleet snapshot is corrupt, re-bootstrapping");
                    let fleet = bootstrap_fleet(defaults);
                    persist_fleet(&blobs, &fleet)?;
                    (fleet, true)
                }
            },
        };

        Ok(Self {
            blobs,
            fleet: Mutex::new(fleet),
            recovered,
        })
    }

    /// Acquire the fleet for a load-modify-save cycle. Callers mutate
    /// through the guard and then [`persist`](Self::persist) before
    /// releasing it.
    pub async fn lock(&self) -> MutexGuard<'_, Vec<Bike>> {
        self.fleet.lock().await
    }

    /// Write-through full-snapshot overwrite; last writer wins.
    pub fn persist(&self, fleet: &[Bike]) -> Result<(), CoreError> {
        persist_fleet(&self.blobs, fleet)
    }

    /// Clone of the last-known fleet.
    pub async fn snapshot(&self) -> Vec<Bike> {
        self.fleet.lock().await.clone()
    }

    /// Whether [`open`](Self::open) had to discard a corrupt snapshot.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }
}

fn persist_fleet(blobs: &BlobStore, fleet: &[Bike]) -> Result<(), CoreError> {
    let json = serde_json::to_string(fleet).map_err(|e| CoreError::Store {
        message: e.to_string(),
    })?;
    blobs.write(FLEET_KEY, &json)
}

/// Synthesize the first-run fleet: sequential ids, zero-padded names,
/// default price/duration, a palette color per slot.
fn bootstrap_fleet(defaults: &FleetDefaults) -> Vec<Bike> {
    (0..defaults.size)
        .map(|i| Bike {
            id: i,
            name: format!("{:03}", i + 1),
            price: defaults.price.clone(),
            rent_duration_min: defaults.rent_duration_min,
            status: BikeStatus::Idle,
            start_time: 0,
            remaining_ms: 0,
            color: BIKE_COLORS[fastrand::usize(..BIKE_COLORS.len())],
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> FleetDefaults {
        FleetDefaults::default()
    }

    #[tokio::test]
    async fn first_run_bootstraps_a_full_idle_fleet() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::open(dir.path()).unwrap());
        let store = FleetStore::open(blobs, &defaults()).unwrap();

        let fleet = store.snapshot().await;
        assert_eq!(fleet.len(), 24);
        assert_eq!(fleet[0].name, "001");
        assert_eq!(fleet[23].name, "024");
        for (i, bike) in fleet.iter().enumerate() {
            assert_eq!(bike.id, u32::try_from(i).unwrap());
            assert_eq!(bike.status, BikeStatus::Idle);
            assert_eq!(bike.start_time, 0);
        }
        assert!(!store.recovered_from_corruption());
    }

    #[tokio::test]
    async fn bootstrap_happens_once_per_install() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::open(dir.path()).unwrap());

        let store = FleetStore::open(Arc::clone(&blobs), &defaults()).unwrap();
        {
            let mut fleet = store.lock().await;
            fleet[3].press(1_000_000);
            store.persist(&fleet).unwrap();
        }

        // Reopening must load the mutated snapshot, not re-bootstrap.
        let reopened = FleetStore::open(blobs, &defaults()).unwrap();
        let fleet = reopened.snapshot().await;
        assert_eq!(fleet[3].status, BikeStatus::Active);
        assert_eq!(fleet[3].start_time, 1_000_000);
    }

    #[tokio::test]
    async fn save_then_load_is_field_for_field_identical() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::open(dir.path()).unwrap());
        let store = FleetStore::open(Arc::clone(&blobs), &defaults()).unwrap();

        let before = store.snapshot().await;
        store.persist(&before).unwrap();

        let reopened = FleetStore::open(blobs, &defaults()).unwrap();
        assert_eq!(reopened.snapshot().await, before);
    }

    #[tokio::test]
    async fn corrupt_snapshot_rebootstraps_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::open(dir.path()).unwrap());
        blobs.write(FLEET_KEY, "{not json").unwrap();

        let store = FleetStore::open(blobs, &defaults()).unwrap();
        assert!(store.recovered_from_corruption());
        assert_eq!(store.snapshot().await.len(), 24);
    }
}
