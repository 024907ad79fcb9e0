//! Periodic task retiring overdue ACTIVE reservations.
use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{info, warn};

use super::ReservationService;

/// Runs `expire_overdue` every `period` until `shutdown` flips to true.
pub fn spawn(svc: ReservationService, period: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = period.as_secs(), "reservation expiry sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = svc.expire_overdue().await {
                        warn!(error = %e, "reservation expiry sweep failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("reservation expiry sweeper stopped");
    })
}
