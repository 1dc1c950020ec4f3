//! Snapshot poll scheduler.
//!
//! While a session is connected, the poller requests a full snapshot
//! immediately and then once per interval. Re-arming replaces the previous
//! timer instead of stacking a second one; a tick while disconnected is a
//! no-op rather than an error.

use std::time::Duration;

use tokio::task::JoinHandle;

use triadnet_proto::Command;

use crate::client::CommandSink;

/// Repeating `get_dashboard_data` timer. At most one armed per session.
#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    /// Arm the timer: one immediate request, then one per interval.
    /// Replaces any previously armed timer.
    pub fn start<S>(&mut self, sink: S)
    where
        S: CommandSink + Send + 'static,
    {
        self.stop();
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if sink.send_command(Command::GetDashboardData).is_err() {
                    tracing::debug!("poll tick while disconnected; skipped");
                }
            }
        }));
    }

    /// Disarm the timer. Safe to call when already disarmed.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SendError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records commands handed to it; refuses them while "disconnected".
    #[derive(Clone, Default)]
    struct RecordingSink {
        connected: Arc<AtomicBool>,
        sent: Arc<Mutex<Vec<Command>>>,
    }

    impl RecordingSink {
        fn connected() -> Self {
            let sink = Self::default();
            sink.connected.store(true, Ordering::SeqCst);
            sink
        }

        fn set_connected(&self, connected: bool) {
            self.connected.store(connected, Ordering::SeqCst);
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl CommandSink for RecordingSink {
        fn send_command(&self, command: Command) -> Result<(), SendError> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(SendError::NotConnected);
            }
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    /// Let spawned timer tasks run up to the current (paused) instant.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_request_then_fixed_cadence() {
        let sink = RecordingSink::connected();
        let mut poller = Poller::new(Duration::from_secs(3));
        poller.start(sink.clone());
        settle().await;
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.sent.lock().unwrap()[0], Command::GetDashboardData);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(sink.count(), 2);

        tokio::time::advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(sink.count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_rather_than_stacks() {
        let sink = RecordingSink::connected();
        let mut poller = Poller::new(Duration::from_secs(3));
        poller.start(sink.clone());
        settle().await;
        poller.start(sink.clone());
        settle().await;
        // One immediate tick per arm, but only the second timer is live.
        assert_eq!(sink.count(), 2);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(sink.count(), 3);
        assert!(poller.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_then_start_leaves_one_timer() {
        let sink = RecordingSink::connected();
        let mut poller = Poller::new(Duration::from_secs(3));
        poller.start(sink.clone());
        settle().await;
        poller.stop();
        assert!(!poller.is_armed());

        poller.start(sink.clone());
        settle().await;
        assert!(poller.is_armed());
        let before = sink.count();
        tokio::time::advance(Duration::from_secs(6)).await;
        settle().await;
        assert_eq!(sink.count(), before + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_disarms() {
        let sink = RecordingSink::connected();
        let mut poller = Poller::new(Duration::from_secs(3));
        poller.start(sink.clone());
        settle().await;
        let before = sink.count();

        poller.stop();
        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(sink.count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_while_disconnected_is_a_noop() {
        let sink = RecordingSink::default();
        let mut poller = Poller::new(Duration::from_secs(3));
        poller.start(sink.clone());
        settle().await;
        assert_eq!(sink.count(), 0);

        // Connection comes back; the next tick goes through.
        sink.set_connected(true);
        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(sink.count(), 1);
    }
}
