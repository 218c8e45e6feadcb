//! The cycle scheduler and its single-flight guard.
//!
//! One cycle = refresh pipeline, then one simulation run. Cycles are
//! strictly non-overlapping: a trigger that arrives while one is in flight
//! is dropped with a log line, never queued. The run lock is the only
//! mutable shared state here and is released on every exit path.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::pipeline::{run_pipeline, PipelineStage};
use super::simulation::{run_simulation, SimulationCommand};

pub struct SchedulerConfig {
    pub project_root: PathBuf,
    pub stages: Vec<PipelineStage>,
    pub simulation: SimulationCommand,
    pub cycle_interval: Duration,
}

pub struct Scheduler {
    config: SchedulerConfig,
    run_lock: Arc<AtomicBool>,
}

/// Clears the run lock when dropped, so the lock releases even if a cycle
/// step returns early or the future is cancelled.
struct RunGuard {
    lock: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.lock.store(false, Ordering::SeqCst);
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            run_lock: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fire one cycle immediately, then one per interval, forever.
    pub async fn start(self: Arc<Self>) {
        info!(
            "Scheduler: cycle every {:.0} min",
            self.config.cycle_interval.as_secs_f64() / 60.0
        );
        let mut ticker = tokio::time::interval(self.config.cycle_interval);
        loop {
            ticker.tick().await;
            self.trigger_cycle().await;
            info!(
                "Next cycle scheduled for {}",
                (Utc::now() + self.config.cycle_interval).format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    /// Run one cycle if none is in flight; otherwise log and return.
    pub async fn trigger_cycle(&self) {
        if self
            .run_lock
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("Cycle already running — skipping");
            return;
        }
        let _guard = RunGuard {
            lock: self.run_lock.clone(),
        };

        let cycle_id = Uuid::new_v4();
        let started = Instant::now();
        info!("Cycle {} started: refreshing market data...", cycle_id);

        run_pipeline(&self.config.stages, &self.config.project_root).await;

        info!("Cycle {}: running simulation...", cycle_id);
        if let Err(e) = run_simulation(&self.config.simulation, &self.config.project_root).await {
            error!("Cycle {}: simulation error: {}", cycle_id, e);
        }

        info!(
            "Cycle {} completed in {:.1}s",
            cycle_id,
            started.elapsed().as_secs_f64()
        );
    }
}
