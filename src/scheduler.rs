//! Background processing loop.
//!
//! One task, one cycle at a time. The loop never exits; recovery from a
//! bad cycle is simply the next tick, because the service re-reads the
//! ledger from scratch every time.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::service::GuestService;

/// Runs processing cycles for the lifetime of the process.
///
/// The first cycle starts immediately. A cycle that overruns its slot
/// delays the next tick instead of letting ticks pile up behind it, so
/// cycles never overlap. A zero interval is floored to one second;
/// config already rejects it at startup.
pub async fn run(service: Arc<GuestService>, interval: Duration) {
    // tokio's interval timer panics on a zero period.
    let period = if interval.is_zero() {
        tracing::warn!("zero sync interval, flooring to 1s");
        Duration::from_secs(1)
    } else {
        interval
    };
    tracing::info!(interval_secs = period.as_secs(), "scheduler started");
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        service.process_all_records().await;
    }
}
