use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};

use crate::application::services::dispatch::{DispatchReport, DispatchService};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub batch_size: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2 * 60),
            batch_size: 2,
        }
    }
}

/// Start/stop controlled loop that runs a dispatch cycle immediately and
/// then once per interval.
///
/// The run-state is the cancellation token of the active loop: present iff
/// running. Cycles never overlap, including a cycle still finishing from a
/// stopped loop and cycles triggered through [`Scheduler::dispatch_now`].
pub struct Scheduler {
    service: Arc<DispatchService>,
    config: SchedulerConfig,
    run_state: Mutex<Option<CancellationToken>>,
    cycle_gate: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(service: Arc<DispatchService>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            run_state: Mutex::new(None),
            cycle_gate: Arc::new(Mutex::new(())),
        }
    }

    pub async fn start(&self) {
        let mut run_state = self.run_state.lock().await;
        if run_state.is_some() {
            info!("scheduler already running");
            return;
        }

        let token = CancellationToken::new();
        *run_state = Some(token.clone());

        let cycle = Cycle {
            service: self.service.clone(),
            gate: self.cycle_gate.clone(),
            batch_size: self.config.batch_size,
        };
        tokio::spawn(run_loop(cycle, self.config.interval, token));
        info!(
            interval_secs = self.config.interval.as_secs(),
            batch_size = self.config.batch_size,
            "scheduler started"
        );
    }

    /// Signals the active loop to stop. An in-flight cycle runs to completion.
    pub async fn stop(&self) {
        let mut run_state = self.run_state.lock().await;
        match run_state.take() {
            Some(token) => {
                token.cancel();
                info!("scheduler stopped");
            }
            None => info!("scheduler not running"),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.run_state.lock().await.is_some()
    }

    /// Runs one cycle on the caller's task, after any in-flight cycle.
    pub async fn dispatch_now(&self, limit: u32) -> anyhow::Result<DispatchReport> {
        let _guard = self.cycle_gate.lock().await;
        self.service.send_pending_messages(limit).await
    }
}

struct Cycle {
    service: Arc<DispatchService>,
    gate: Arc<Mutex<()>>,
    batch_size: u32,
}

impl Cycle {
    async fn run(&self, token: &CancellationToken) {
        let _guard = self.gate.lock().await;
        if token.is_cancelled() {
            return;
        }

        info!(batch_size = self.batch_size, "processing pending messages");
        if let Err(err) = self.service.send_pending_messages(self.batch_size).await {
            let err = format!("{err:#}");
            error!(error = %err, "dispatch cycle failed");
        }
    }
}

async fn run_loop(cycle: Cycle, period: Duration, token: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    cycle
        .run(&token)
        .instrument(info_span!("dispatch_cycle"))
        .await;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                cycle
                    .run(&token)
                    .instrument(info_span!("dispatch_cycle"))
                    .await;
            }
        }
    }
}
