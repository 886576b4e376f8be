/// Periodic payload poller
///
/// Fetches once at start and then on every tick of a fixed interval, sending
/// each outcome to the UI over a channel. At most one fetch is in flight:
/// ticks that fire while a fetch is outstanding are skipped.
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::error::FetchError;
use super::source::PayloadSource;
use super::types::DashboardPayload;

/// Result of one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// Monotonic fetch number, starting at 1
    pub seq: u64,
    pub completed_at: DateTime<Utc>,
    pub result: Result<DashboardPayload, FetchError>,
}

/// Poller for a single payload source
pub struct Poller {
    source: Arc<dyn PayloadSource>,
    interval: Duration,
    channel_buffer_size: usize,
}

impl Poller {
    pub fn new(source: Arc<dyn PayloadSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            channel_buffer_size: 16,
        }
    }

    /// Set outcome channel buffer size
    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size.max(1);
        self
    }

    /// Spawn the polling task
    ///
    /// Returns the handle controlling the task and the receiver for outcomes.
    /// The receiver yields `None` once the task has stopped.
    pub fn start(self) -> (PollerHandle, mpsc::Receiver<PollOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::channel(self.channel_buffer_size);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let task = tokio::spawn(run_poll_loop(
            self.source,
            self.interval,
            outcome_tx,
            shutdown_rx,
            refresh_rx,
        ));

        let handle = PollerHandle {
            shutdown_tx: Some(shutdown_tx),
            refresh_tx,
            task: Some(task),
        };
        (handle, outcome_rx)
    }
}

/// Lifecycle handle for a running [`Poller`]
///
/// Dropping the handle aborts the task.
pub struct PollerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    refresh_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Ask for an immediate fetch. Returns false if one is already queued or
    /// the poller has stopped.
    pub fn refresh_now(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    /// Check whether the polling task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop future ticks, drop any in-flight request and wait for the task
    pub async fn stop(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Poller task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Main poll loop, ends on shutdown or when the outcome receiver is dropped
async fn run_poll_loop(
    source: Arc<dyn PayloadSource>,
    period: Duration,
    outcome_tx: mpsc::Sender<PollOutcome>,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut refresh_rx: mpsc::Receiver<()>,
) {
    info!(
        "Starting poller for {} every {:?}",
        source.describe(),
        period
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut seq = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            _ = interval.tick() => {}
            Some(()) = refresh_rx.recv() => {
                debug!("Manual refresh requested");
                interval.reset();
            }
        }

        seq += 1;
        let result = tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                debug!("Dropping in-flight fetch #{}", seq);
                break;
            }
            result = source.fetch() => result,
        };

        match &result {
            Ok(payload) => debug!(
                "Fetch #{} ok: {} with {} prices, {} news",
                seq,
                payload.ticker,
                payload.chart.prices.len(),
                payload.news.len()
            ),
            Err(e) if e.is_transient() => warn!("Fetch #{} failed: {}", seq, e),
            Err(e) => error!("Fetch #{} failed: {}", seq, e),
        }

        let outcome = PollOutcome {
            seq,
            completed_at: Utc::now(),
            result,
        };
        // A full channel must not hold up shutdown
        let sent = tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                debug!("Dropping undelivered outcome #{}", seq);
                break;
            }
            sent = outcome_tx.send(outcome) => sent,
        };
        if sent.is_err() {
            warn!("Outcome receiver dropped, stopping poller");
            break;
        }
    }

    info!("Poller for {} stopped", source.describe());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::PriceHistory;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn payload(ticker: &str) -> DashboardPayload {
        DashboardPayload {
            ticker: ticker.to_string(),
            fundamentals: Default::default(),
            chart: PriceHistory {
                dates: vec!["2024-01-01".to_string()],
                prices: vec![100.0],
            },
            news: vec![],
        }
    }

    /// Replays scripted results, then repeats the last one
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<DashboardPayload, FetchError>>>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<DashboardPayload, FetchError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl PayloadSource for ScriptedSource {
        async fn fetch(&self) -> Result<DashboardPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let result = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front().unwrap()
                } else {
                    script.front().cloned().unwrap()
                }
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    async fn next_outcome(rx: &mut mpsc::Receiver<PollOutcome>) -> PollOutcome {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("outcome within timeout")
            .expect("poller still running")
    }

    #[tokio::test]
    async fn test_first_fetch_does_not_wait_for_interval() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(payload("ACME"))]));
        let (handle, mut rx) = Poller::new(source, Duration::from_secs(3600)).start();

        let outcome = next_outcome(&mut rx).await;
        assert_eq!(outcome.seq, 1);
        assert_eq!(outcome.result.unwrap().ticker, "ACME");

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_outcomes_arrive_in_fetch_order() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(payload("ACME")),
            Err(FetchError::Transport("connection refused".to_string())),
            Ok(payload("ACME2")),
        ]));
        let (handle, mut rx) = Poller::new(source, Duration::from_millis(10)).start();

        let first = next_outcome(&mut rx).await;
        let second = next_outcome(&mut rx).await;
        let third = next_outcome(&mut rx).await;

        assert_eq!((first.seq, second.seq, third.seq), (1, 2, 3));
        assert!(first.result.is_ok());
        assert_eq!(
            second.result,
            Err(FetchError::Transport("connection refused".to_string()))
        );
        assert_eq!(third.result.unwrap().ticker, "ACME2");

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_slow_fetches_never_overlap() {
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(payload("ACME"))]).with_delay(Duration::from_millis(30)),
        );
        let (handle, mut rx) =
            Poller::new(source.clone(), Duration::from_millis(5)).start();

        for _ in 0..4 {
            next_outcome(&mut rx).await;
        }
        handle.stop().await;

        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_ends_outcome_stream() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(payload("ACME"))]));
        let (handle, mut rx) = Poller::new(source, Duration::from_secs(3600)).start();

        next_outcome(&mut rx).await;
        handle.stop().await;

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_drops_in_flight_fetch() {
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(payload("ACME"))]).with_delay(Duration::from_secs(3600)),
        );
        let (handle, mut rx) = Poller::new(source.clone(), Duration::from_secs(3600)).start();

        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        tokio::time::timeout(Duration::from_secs(2), handle.stop())
            .await
            .expect("stop does not wait for the request");

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_with_full_outcome_channel() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(payload("ACME"))]));
        let (handle, mut rx) = Poller::new(source.clone(), Duration::from_millis(1))
            .with_channel_buffer_size(1)
            .start();

        // First outcome fills the channel, the second is stuck in send
        while source.calls.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(2), handle.stop())
            .await
            .expect("stop does not wait for the receiver");

        assert_eq!(next_outcome(&mut rx).await.seq, 1);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_now_triggers_fetch() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(payload("ACME")),
            Ok(payload("ACME2")),
        ]));
        let (handle, mut rx) = Poller::new(source, Duration::from_secs(3600)).start();

        next_outcome(&mut rx).await;
        assert!(handle.refresh_now());
        let outcome = next_outcome(&mut rx).await;

        assert_eq!(outcome.seq, 2);
        assert_eq!(outcome.result.unwrap().ticker, "ACME2");

        handle.stop().await;
    }
}
