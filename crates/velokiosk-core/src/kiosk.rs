// ── Kiosk facade ──
//
// Process-scoped owner of the rental fleet. Manages the full lifecycle:
// press routing through a bounded channel, the timer-driven reconcile
// loop, history recording, and detached external-ledger sync. All fleet
// mutations funnel through the store's single mutex.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::KioskConfig;
use crate::error::CoreError;
use crate::ledger::HistoryLedger;
use crate::model::bike::JUST_CLOSED_MS;
use crate::model::{Bike, BikeStatus};
use crate::store::{BlobStore, FleetStore};
use crate::sync::{SyncGateway, activity_rows};

const PRESS_CHANNEL_SIZE: usize = 32;
const NOTICE_CHANNEL_SIZE: usize = 64;

// ── Observer events ──────────────────────────────────────────────────

/// Push notification for UI/CLI consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Success(String),
    Error(String),
}

#[derive(Debug)]
struct PressRequest {
    bike_id: u32,
}

// ── Kiosk ────────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<KioskInner>`. Construct once per process,
/// inject into whatever renders the fleet, and drive the lifecycle with
/// [`start()`](Self::start) / [`stop()`](Self::stop).
#[derive(Clone)]
pub struct Kiosk {
    inner: Arc<KioskInner>,
}

struct KioskInner {
    config: KioskConfig,
    store: Arc<FleetStore>,
    ledger: Arc<HistoryLedger>,
    gateway: Arc<dyn SyncGateway>,
    fleet_tx: watch::Sender<Arc<Vec<Bike>>>,
    notice_tx: broadcast::Sender<AppEvent>,
    press_tx: mpsc::Sender<PressRequest>,
    press_rx: Mutex<Option<mpsc::Receiver<PressRequest>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    /// Set whenever a status change lands in the ledger; the loop swaps
    /// it out and pushes the rebuilt report.
    history_dirty: AtomicBool,
    /// Set by a detached sync task on failure; the loop swaps it out
    /// and backs off before the next tick.
    sync_failed: AtomicBool,
}

impl Kiosk {
    /// Open the stores and build the kiosk. Does NOT start the
    /// background tasks -- call [`start()`](Self::start).
    pub fn new(config: KioskConfig, gateway: Arc<dyn SyncGateway>) -> Result<Self, CoreError> {
        config.validate()?;

        let blobs = Arc::new(BlobStore::open(&config.data_dir)?);
        let store = Arc::new(FleetStore::open(Arc::clone(&blobs), &config.fleet)?);
        let ledger = Arc::new(HistoryLedger::open(blobs)?);

        let (fleet_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);
        let (press_tx, press_rx) = mpsc::channel(PRESS_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(KioskInner {
                config,
                store,
                ledger,
                gateway,
                fleet_tx,
                notice_tx,
                press_tx,
                press_rx: Mutex::new(Some(press_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
                history_dirty: AtomicBool::new(false),
                sync_failed: AtomicBool::new(false),
            }),
        })
    }

    pub fn config(&self) -> &KioskConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Publish the loaded fleet and spawn the background tasks (press
    /// processor, reconcile loop). Idempotent: a second call is a no-op.
    pub async fn start(&self) {
        let Some(rx) = self.inner.press_rx.lock().await.take() else {
            warn!("kiosk already started");
            return;
        };

        if self.inner.store.recovered_from_corruption() {
            notify_error(
                &self.inner,
                "Fleet snapshot was corrupt; a fresh fleet was bootstrapped".into(),
            );
        }
        if self.inner.ledger.recovered_from_corruption() {
            notify_error(
                &self.inner,
                "Status history was corrupt; history restarted empty".into(),
            );
        }

        let snapshot = Arc::new(self.inner.store.snapshot().await);
        self.inner.fleet_tx.send_replace(snapshot);

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(press_processor_task(
            Arc::clone(&self.inner),
            rx,
        )));
        handles.push(tokio::spawn(reconcile_task(Arc::clone(&self.inner))));
        info!(
            fleet_size = self.inner.config.fleet.size,
            "kiosk started"
        );
    }

    /// Cancel the background tasks and wait for them to finish.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("kiosk stopped");
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Enqueue a press for `bike_id`. Fire-and-forget: the transition is
    /// applied by the press processor; the outcome arrives on the notice
    /// channel.
    pub fn press(&self, bike_id: u32) -> Result<(), CoreError> {
        self.inner
            .press_tx
            .try_send(PressRequest { bike_id })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => CoreError::PressQueueFull,
                mpsc::error::TrySendError::Closed(_) => CoreError::NotRunning,
            })
    }

    /// Settings mutation: rename/reprice/retime one bike. Serialized
    /// through the same fleet mutex as the loop; never touches a
    /// running rental's status.
    pub async fn update_bike_settings(
        &self,
        bike_id: u32,
        name: Option<String>,
        price: Option<String>,
        rent_duration_min: Option<i64>,
    ) -> Result<(), CoreError> {
        if rent_duration_min.is_some_and(|min| min <= 0) {
            return Err(CoreError::Config {
                message: "rent duration must be positive".into(),
            });
        }

        let mut fleet = self.inner.store.lock().await;
        let bike = fleet
            .iter_mut()
            .find(|b| b.id == bike_id)
            .ok_or(CoreError::BikeNotFound { id: bike_id })?;
        if let Some(name) = name {
            bike.name = name;
        }
        if let Some(price) = price {
            bike.price = price;
        }
        if let Some(min) = rent_duration_min {
            bike.rent_duration_min = min;
        }
        self.inner.store.persist(&fleet)?;
        let snapshot = Arc::new(fleet.clone());
        drop(fleet);

        self.inner.fleet_tx.send_replace(snapshot);
        Ok(())
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to fleet snapshots, pushed on every tick and every
    /// press. Holds the empty fleet until [`start()`](Self::start).
    pub fn fleet(&self) -> watch::Receiver<Arc<Vec<Bike>>> {
        self.inner.fleet_tx.subscribe()
    }

    /// Subscribe to success/error notices.
    pub fn notices(&self) -> broadcast::Receiver<AppEvent> {
        self.inner.notice_tx.subscribe()
    }

    /// Clone of the last-known fleet.
    pub async fn snapshot(&self) -> Vec<Bike> {
        self.inner.store.snapshot().await
    }

    /// The 24-hour audit report (delegates to the ledger).
    pub async fn daily_report(&self) -> Vec<Vec<String>> {
        self.inner
            .ledger
            .daily_report(Utc::now().timestamp_millis())
            .await
    }
}

// ── Press processor ──────────────────────────────────────────────────

async fn press_processor_task(inner: Arc<KioskInner>, mut rx: mpsc::Receiver<PressRequest>) {
    let cancel = inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            request = rx.recv() => {
                let Some(request) = request else { break };
                if let Err(e) = apply_press(&inner, request.bike_id).await {
                    warn!(bike_id = request.bike_id, error = %e, "press rejected");
                    notify_error(&inner, e.to_string());
                }
            }
        }
    }
}

/// One load-modify-save press cycle under the fleet mutex.
async fn apply_press(inner: &Arc<KioskInner>, bike_id: u32) -> Result<(), CoreError> {
    let now = Utc::now().timestamp_millis();

    let mut fleet = inner.store.lock().await;
    let bike = fleet
        .iter_mut()
        .find(|b| b.id == bike_id)
        .ok_or(CoreError::BikeNotFound { id: bike_id })?;
    let outcome = bike.press(now);
    let pressed = bike.clone();
    inner.store.persist(&fleet)?;
    let snapshot = Arc::new(fleet.clone());
    drop(fleet);

    if inner
        .ledger
        .record_if_changed(&pressed, now)
        .await?
        .is_some()
    {
        inner.history_dirty.store(true, Ordering::Relaxed);
    }

    inner.fleet_tx.send_replace(snapshot);
    debug!(bike = %pressed.name, status = %pressed.status, "press applied");
    notify_success(inner, format!("Bike {} {}", pressed.name, outcome.message()));
    Ok(())
}

// ── Reconcile loop ───────────────────────────────────────────────────

async fn reconcile_task(inner: Arc<KioskInner>) {
    let cancel = inner.cancel.clone();
    let backoff = inner.config.sync.backoff;

    let mut interval = tokio::time::interval(inner.config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    let mut last_engaged: Option<usize> = None;
    let mut holdoff = inner.config.sync.holdoff_ticks;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                run_tick(&inner, &mut last_engaged, &mut holdoff).await;

                if inner.sync_failed.swap(false, Ordering::Relaxed) {
                    warn!(backoff_ms = backoff.as_millis(), "sync failure reported, backing off");
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(backoff) => {}
                    }
                    interval.reset();
                }
            }
        }
    }
}

/// One reconcile pass over the whole fleet.
async fn run_tick(inner: &Arc<KioskInner>, last_engaged: &mut Option<usize>, holdoff: &mut u32) {
    let cfg = &inner.config;
    let now = Utc::now().timestamp_millis();

    let mut fleet = inner.store.lock().await;
    let mut transitioned: Vec<usize> = Vec::new();

    for (i, bike) in fleet.iter_mut().enumerate() {
        // Transient sentinel normalization. The just-closed sentinel is
        // cleared before the Canceled heal, so a healed bike keeps it
        // for one more tick of UI feedback.
        if bike.remaining_ms == JUST_CLOSED_MS && bike.status == BikeStatus::Idle {
            bike.remaining_ms = 0;
        }
        if bike.status == BikeStatus::Canceled {
            bike.status = BikeStatus::Idle;
            transitioned.push(i);
        }

        if bike.is_engaged() {
            bike.remaining_ms = bike.remaining_at(now);
            if bike.remaining_ms <= cfg.early_warning_ms && bike.status == BikeStatus::Active {
                bike.status = BikeStatus::WaitForCancel;
                transitioned.push(i);
            }
            if bike.remaining_ms < 0 {
                bike.remaining_ms = 0;
            }
        }
    }

    // Write-through: loop errors are reported, never fatal here.
    if let Err(e) = inner.store.persist(&fleet) {
        warn!(error = %e, "fleet persist failed");
        notify_error(inner, format!("Failed to persist fleet: {e}"));
    }

    let changed: Vec<Bike> = transitioned.iter().map(|&i| fleet[i].clone()).collect();
    let engaged = fleet.iter().filter(|b| b.is_engaged()).count();
    let snapshot = Arc::new(fleet.clone());
    drop(fleet);

    inner.fleet_tx.send_replace(Arc::clone(&snapshot));

    for bike in &changed {
        match inner.ledger.record_if_changed(bike, now).await {
            Ok(Some(change)) => {
                debug!(
                    bike = %change.bike_name,
                    from = %change.from_status,
                    to = %change.to_status,
                    "status change recorded"
                );
                inner.history_dirty.store(true, Ordering::Relaxed);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "history append failed");
                notify_error(inner, format!("Failed to record history: {e}"));
            }
        }
    }

    // Sync decision: any change in the engaged count forces a
    // clear-then-write; otherwise the holdoff countdown provides a
    // heartbeat write so a dead sync path heals itself.
    let count_changed = *last_engaged != Some(engaged);
    *holdoff = holdoff.saturating_sub(1);
    if count_changed || *holdoff == 0 {
        *holdoff = cfg.sync.holdoff_ticks;
        *last_engaged = Some(engaged);
        spawn_activity_sync(inner, snapshot, now, count_changed);
    }

    if inner.history_dirty.swap(false, Ordering::Relaxed) {
        spawn_report_sync(inner, now);
    }
}

// ── Detached sync dispatch ───────────────────────────────────────────
//
// Gateway calls may block on network I/O; they run off the tick's
// critical path and surface failures through the notice channel plus
// the loop's backoff flag.

fn spawn_activity_sync(inner: &Arc<KioskInner>, fleet: Arc<Vec<Bike>>, now: i64, delete: bool) {
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        let rows = activity_rows(&fleet, now);
        let range = inner.config.sync.activity_range.as_str();
        let result = if delete {
            inner.gateway.clear_and_write(range, rows).await
        } else {
            inner.gateway.write(range, rows).await
        };
        match result {
            Ok(()) => debug!(range, delete, "activity sync complete"),
            Err(e) => {
                warn!(error = %e, "activity sync failed");
                inner.sync_failed.store(true, Ordering::Relaxed);
                notify_error(&inner, format!("Sync failed: {e}"));
            }
        }
    });
}

fn spawn_report_sync(inner: &Arc<KioskInner>, now: i64) {
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        let rows = inner.ledger.daily_report(now).await;
        let range = inner.config.sync.report_range.as_str();
        match inner.gateway.clear_and_write(range, rows).await {
            Ok(()) => debug!(range, "report sync complete"),
            Err(e) => {
                warn!(error = %e, "report sync failed");
                inner.sync_failed.store(true, Ordering::Relaxed);
                notify_error(&inner, format!("Sync failed: {e}"));
            }
        }
    });
}

fn notify_success(inner: &KioskInner, message: String) {
    let _ = inner.notice_tx.send(AppEvent::Success(message));
}

fn notify_error(inner: &KioskInner, message: String) {
    let _ = inner.notice_tx.send(AppEvent::Error(message));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sync::{SyncError, SyncErrorCode};
    use async_trait::async_trait;
    use std::time::Duration;

    // ── Test gateway ─────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum GatewayCall {
        Write { range: String, rows: usize },
        ClearAndWrite { range: String, rows: usize },
    }

    #[derive(Default)]
    struct RecordingGateway {
        calls: std::sync::Mutex<Vec<GatewayCall>>,
        fail: AtomicBool,
    }

    impl RecordingGateway {
        fn calls(&self) -> Vec<GatewayCall> {
            self.calls.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), SyncError> {
            if self.fail.load(Ordering::Relaxed) {
                Err(SyncError::new(SyncErrorCode::Unavailable, "offline"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SyncGateway for RecordingGateway {
        async fn write(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError> {
            self.check()?;
            self.calls.lock().unwrap().push(GatewayCall::Write {
                range: range.into(),
                rows: rows.len(),
            });
            Ok(())
        }

        async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError> {
            self.check()?;
            self.calls.lock().unwrap().push(GatewayCall::Write {
                range: range.into(),
                rows: rows.len(),
            });
            Ok(())
        }

        async fn clear_and_write(
            &self,
            range: &str,
            rows: Vec<Vec<String>>,
        ) -> Result<(), SyncError> {
            self.check()?;
            self.calls.lock().unwrap().push(GatewayCall::ClearAndWrite {
                range: range.into(),
                rows: rows.len(),
            });
            Ok(())
        }
    }

    // ── Harness ──────────────────────────────────────────────────────

    fn test_config(dir: &std::path::Path) -> KioskConfig {
        let mut cfg = KioskConfig::new(dir);
        cfg.fleet.size = 2;
        cfg.fleet.rent_duration_min = 1;
        cfg.tick_interval = Duration::from_secs(1);
        cfg.sync.holdoff_ticks = 1_000; // keep heartbeats out of the way
        cfg.sync.backoff = Duration::from_millis(100);
        cfg
    }

    async fn kiosk_with(
        cfg: KioskConfig,
    ) -> (Kiosk, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::default());
        let kiosk = Kiosk::new(cfg, Arc::clone(&gateway) as Arc<dyn SyncGateway>).unwrap();
        kiosk.start().await;
        (kiosk, gateway)
    }

    /// Let queued presses and detached tasks run.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    async fn one_tick() {
        tokio::time::sleep(Duration::from_millis(1_100)).await;
    }

    // ── Scenarios ────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn press_rents_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;
        let mut notices = kiosk.notices();

        kiosk.press(0).unwrap();
        settle().await;

        let fleet = kiosk.snapshot().await;
        assert_eq!(fleet[0].status, BikeStatus::Active);
        assert_eq!(fleet[0].remaining_ms, crate::model::MS_PER_MINUTE);
        assert_eq!(
            notices.recv().await.unwrap(),
            AppEvent::Success("Bike 001 rented".into())
        );

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn expired_rental_flips_to_wait_for_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;

        kiosk.press(0).unwrap();
        settle().await;

        // Simulate 61s of elapsed rental on a 1-minute duration.
        {
            let mut fleet = kiosk.inner.store.lock().await;
            fleet[0].start_time -= 61_000;
            kiosk.inner.store.persist(&fleet).unwrap();
        }

        one_tick().await;

        let fleet = kiosk.snapshot().await;
        assert_eq!(fleet[0].status, BikeStatus::WaitForCancel);
        assert_eq!(fleet[0].remaining_ms, 0);
        let change = kiosk.inner.ledger.last_change_for(0).await.unwrap();
        assert_eq!(change.from_status, BikeStatus::Active);
        assert_eq!(change.to_status, BikeStatus::WaitForCancel);

        // A second tick over the same state must not duplicate the event.
        let count = kiosk.inner.ledger.change_count().await;
        one_tick().await;
        assert_eq!(kiosk.inner.ledger.change_count().await, count);

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn canceled_bike_heals_to_idle_within_one_tick() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;

        kiosk.press(0).unwrap();
        settle().await;
        kiosk.press(0).unwrap(); // within the grace window: cancels
        settle().await;
        assert_eq!(kiosk.snapshot().await[0].status, BikeStatus::Canceled);

        one_tick().await;

        let fleet = kiosk.snapshot().await;
        assert_eq!(fleet[0].status, BikeStatus::Idle);
        // The just-closed sentinel survives the healing tick...
        assert_eq!(fleet[0].remaining_ms, 1);
        let change = kiosk.inner.ledger.last_change_for(0).await.unwrap();
        assert_eq!(change.from_status, BikeStatus::Canceled);
        assert_eq!(change.to_status, BikeStatus::Idle);

        // ...and clears on the next one.
        one_tick().await;
        assert_eq!(kiosk.snapshot().await[0].remaining_ms, 0);

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn engaged_count_change_forces_clear_then_write() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, gateway) = kiosk_with(test_config(dir.path())).await;

        // First tick seeds the sheet (count None -> 0).
        one_tick().await;
        settle().await;
        let seeded = gateway.calls();
        assert!(matches!(
            seeded.first(),
            Some(GatewayCall::ClearAndWrite { rows: 0, .. })
        ));

        kiosk.press(0).unwrap();
        settle().await;
        one_tick().await;
        settle().await;

        let calls = gateway.calls();
        assert!(calls.len() > seeded.len());
        // Count went 0 -> 1, so the activity push must be clear-then-write
        // with one engaged row, holdoff notwithstanding.
        assert!(calls.iter().any(|c| matches!(
            c,
            GatewayCall::ClearAndWrite { range, rows: 1 } if range == "Current!A2:D"
        )));

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn holdoff_expiry_heartbeats_a_plain_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        cfg.sync.holdoff_ticks = 3;
        let (kiosk, gateway) = kiosk_with(cfg).await;

        // Tick 1 syncs on the seed count change; ticks 2-4 count the
        // holdoff down to the heartbeat.
        for _ in 0..4 {
            one_tick().await;
        }
        settle().await;

        let calls = gateway.calls();
        assert!(matches!(calls.first(), Some(GatewayCall::ClearAndWrite { .. })));
        assert!(
            calls
                .iter()
                .any(|c| matches!(c, GatewayCall::Write { range, .. } if range == "Current!A2:D")),
            "expected a heartbeat write, got {calls:?}"
        );

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn sync_failure_is_non_fatal_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, gateway) = kiosk_with(test_config(dir.path())).await;
        let mut notices = kiosk.notices();
        gateway.fail.store(true, Ordering::Relaxed);

        kiosk.press(0).unwrap();
        settle().await;
        let recorded = kiosk.inner.ledger.change_count().await;

        one_tick().await; // triggers the failing sync
        settle().await;

        let mut saw_sync_error = false;
        while let Ok(event) = notices.try_recv() {
            if matches!(&event, AppEvent::Error(msg) if msg.starts_with("Sync failed")) {
                saw_sync_error = true;
            }
        }
        assert!(saw_sync_error);
        assert_eq!(kiosk.inner.ledger.change_count().await, recorded);

        // The loop must keep reconciling after the backoff.
        gateway.fail.store(false, Ordering::Relaxed);
        {
            let mut fleet = kiosk.inner.store.lock().await;
            fleet[0].start_time -= 61_000;
            kiosk.inner.store.persist(&fleet).unwrap();
        }
        one_tick().await;
        one_tick().await;
        assert_eq!(
            kiosk.snapshot().await[0].status,
            BikeStatus::WaitForCancel
        );

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_bike_press_is_a_reported_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;
        let mut notices = kiosk.notices();

        let before = kiosk.snapshot().await;
        kiosk.press(99).unwrap();
        settle().await;

        assert_eq!(kiosk.snapshot().await, before);
        assert_eq!(kiosk.inner.ledger.change_count().await, 0);
        assert_eq!(
            notices.recv().await.unwrap(),
            AppEvent::Error("Bike not found: 99".into())
        );

        kiosk.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn press_after_stop_reports_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;
        kiosk.stop().await;

        // The processor exited and dropped its receiver on cancel.
        assert!(matches!(kiosk.press(0), Err(CoreError::NotRunning)));
    }

    #[tokio::test(start_paused = true)]
    async fn settings_update_renames_without_touching_status() {
        let dir = tempfile::tempdir().unwrap();
        let (kiosk, _gateway) = kiosk_with(test_config(dir.path())).await;

        kiosk.press(0).unwrap();
        settle().await;
        kiosk
            .update_bike_settings(0, Some("VIP".into()), None, Some(90))
            .await
            .unwrap();

        let fleet = kiosk.snapshot().await;
        assert_eq!(fleet[0].name, "VIP");
        assert_eq!(fleet[0].rent_duration_min, 90);
        assert_eq!(fleet[0].status, BikeStatus::Active);

        assert!(
            kiosk
                .update_bike_settings(0, None, None, Some(0))
                .await
                .is_err()
        );

        kiosk.stop().await;
    }
}
