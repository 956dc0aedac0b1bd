//! Heartbeat: the per-frame tick task.
//!
//! The remote scene process advances its simulation on `scene:tick` calls
//! carrying elapsed seconds. The heartbeat is an explicit, cancellable
//! periodic task rather than an ad-hoc recurring callback: cancelling (or
//! dropping) the handle before an un-fired tick is guaranteed to suppress
//! it, so a closed view can never leave a dangling timer behind.

#[cfg(test)]
#[path = "heartbeat_test.rs"]
mod heartbeat_test;

use std::time::{Duration, Instant};

use frames::Frame;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::protocol;

/// Owning handle for the tick task. Aborts the task on drop.
pub struct Heartbeat {
    handle: JoinHandle<()>,
}

impl Heartbeat {
    /// Spawn a tick task that sends `scene:tick` frames on `tx` at
    /// `interval` until cancelled or the receiver goes away.
    #[must_use]
    pub fn spawn(tx: UnboundedSender<Frame>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            let mut last: Option<Instant> = None;
            loop {
                timer.tick().await;
                let now = Instant::now();
                let dt = tick_delta(last, now);
                last = Some(now);
                if tx.send(protocol::tick(dt)).is_err() {
                    tracing::debug!("heartbeat stopped: outbound channel closed");
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop the heartbeat. No tick fires after the abort is observed.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Elapsed seconds between ticks.
///
/// The very first tick has no previous frame and reports 0.0; the result is
/// clamped so a tick can never carry a negative or non-finite value.
fn tick_delta(last: Option<Instant>, now: Instant) -> f64 {
    let Some(last) = last else {
        return 0.0;
    };
    let dt = now.duration_since(last).as_secs_f64();
    if dt.is_finite() && dt >= 0.0 { dt } else { 0.0 }
}
