//! Time sources for the roll sequencer.
//!
//! The controller never sleeps. It asks a [`Timer`] to deliver a
//! [`TickToken`] after a delay, and the host feeds delivered tokens back
//! through [`DiceController::on_tick`](crate::DiceController::on_tick).

use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sequencer::TickToken;

/// Monotonic clock.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that follows tokio's time, so it pauses and advances with the
/// runtime under `tokio::time::pause`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Schedule-once timer with cancellation.
///
/// At most one tick is pending at a time; scheduling replaces any tick that
/// has not fired yet.
pub trait Timer {
    fn schedule(&mut self, delay: Duration, token: TickToken);
    fn cancel(&mut self);
}

/// Timer backed by tokio tasks.
///
/// Each scheduled tick is a task that sleeps and then sends its token down
/// an unbounded channel. Cancelling (or dropping the timer) aborts the task.
pub struct TokioTimer {
    handle: Handle,
    tx: mpsc::UnboundedSender<TickToken>,
    pending: Option<JoinHandle<()>>,
}

impl TokioTimer {
    /// Create a timer that spawns on `handle`, plus the receiving end for
    /// its ticks.
    pub fn channel(handle: Handle) -> (Self, mpsc::UnboundedReceiver<TickToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                handle,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Timer for TokioTimer {
    fn schedule(&mut self, delay: Duration, token: TickToken) {
        self.cancel();
        let tx = self.tx.clone();
        self.pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the UI is shutting down.
            let _ = tx.send(token);
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::RollSequencer;

    fn token() -> TickToken {
        let mut seq = RollSequencer::new(Duration::from_millis(80), Duration::from_secs(1));
        seq.start(Instant::now()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_delivered_after_delay() {
        let (mut timer, mut rx) = TokioTimer::channel(Handle::current());
        let token = token();
        timer.schedule(Duration::from_millis(80), token);

        tokio::time::sleep(Duration::from_millis(79)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(token));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_delivery() {
        let (mut timer, mut rx) = TokioTimer::channel(Handle::current());
        timer.schedule(Duration::from_millis(80), token());
        assert!(timer.is_pending());
        timer.cancel();
        assert!(!timer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending() {
        let (mut timer, mut rx) = TokioTimer::channel(Handle::current());
        let token = token();
        timer.schedule(Duration::from_millis(80), token);
        timer.schedule(Duration::from_millis(160), token);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.try_recv().ok(), Some(token));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending() {
        let (mut timer, mut rx) = TokioTimer::channel(Handle::current());
        timer.schedule(Duration::from_millis(10), token());
        drop(timer);
        // Sender dropped with the timer and the task aborted, so the
        // channel closes without a tick.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let start = TokioClock.now();
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(TokioClock.now() - start, Duration::from_millis(500));
    }
}
