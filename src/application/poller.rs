// Dashboard poller - fetch, transform, render, reschedule
use crate::application::chart_source::ChartSource;
use crate::application::chart_view::ChartView;
use crate::domain::telemetry::into_data_provider;
use crate::domain::time_window::TimeWindow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Drives the refresh cycle for one chart view.
///
/// Requests are strictly sequential: the next one is only armed after the
/// previous one has completed, successfully or not.
pub struct DashboardPoller {
    source: Arc<dyn ChartSource>,
    view: Arc<dyn ChartView>,
    window: TimeWindow,
    interval: Duration,
}

impl DashboardPoller {
    pub fn new(
        source: Arc<dyn ChartSource>,
        view: Arc<dyn ChartView>,
        window: TimeWindow,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            view,
            window,
            interval,
        }
    }

    /// Spawn the poll loop. The first refresh happens immediately.
    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Run one refresh against the current window.
    /// Returns true when the chart was updated.
    pub async fn refresh(&self) -> bool {
        let since = self.window.current();

        match self.source.fetch_chart(&since).await {
            Ok(payload) => {
                let points = into_data_provider(payload);
                tracing::debug!("Chart refreshed for since={}: {} points", since, points.len());
                self.view.set_data_provider(points);
                self.view.validate_data();
                true
            }
            Err(e) => {
                tracing::warn!("Chart refresh failed for since={}: {}", since, e);
                false
            }
        }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut window_rx = self.window.subscribe();
        window_rx.borrow_and_update();

        tracing::info!(
            "Dashboard poller started (since={}, interval={:?})",
            self.window.current(),
            self.interval
        );

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            // Awaiting response. Teardown abandons the request unapplied.
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => break,
                _ = self.refresh() => {}
            }

            // Idle with the timer armed. A window change that arrived while
            // the request was in flight is still pending here and fires at once.
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => break,
                Ok(()) = window_rx.changed() => {
                    let since = window_rx.borrow_and_update().clone();
                    tracing::info!("Time window changed to {}, refreshing now", since);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Dashboard poller stopped");
    }
}

/// Owns a running poller. Stopping or dropping it tears the poller down.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel the pending timer; no refresh fires afterwards.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop and wait for the poll loop to exit.
    pub async fn stop_and_wait(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Dashboard poller task failed: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
