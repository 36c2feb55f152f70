//! Periodic rendering of the registry into one status line.
use crate::counter::TransferSnapshot;
use crate::observer::StatusObserver;
use crate::registry::ProgressRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Separator placed between transfers on the status line.
pub const SEPARATOR: &str = " | ";

/// Joins already-sorted snapshots into a single status line.
pub fn render_line(snapshots: &[TransferSnapshot]) -> String {
    snapshots
        .iter()
        .map(TransferSnapshot::render)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Redraws the status line every `period` until `stop` fires, then draws
/// the final state once more and returns it.
pub async fn run_aggregator(
    registry: Arc<ProgressRegistry>,
    observer: Arc<dyn StatusObserver>,
    period: Duration,
    stop: CancellationToken,
) -> String {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {
                let line = render_line(&registry.snapshot().await);
                observer.update(&line);
            }
        }
    }

    let line = render_line(&registry.snapshot().await);
    observer.finish(&line);
    line
}
