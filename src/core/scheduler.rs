//! Cron-based scheduler aligned to candle boundaries

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::runtime::AnalysisRuntime;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("resolution of {0} minutes does not align to hour or day boundaries")]
    UnalignedResolution(u32),

    #[error("invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },
}

/// Fires one second after each candle of the given width closes.
#[derive(Debug, Clone)]
pub struct CandleSchedule {
    expr: String,
    schedule: Schedule,
}

impl CandleSchedule {
    pub fn new(resolution_minutes: u32) -> Result<Self, ScheduleError> {
        // Cron format: second minute hour day month weekday
        let expr = match resolution_minutes {
            m if m > 0 && m < 60 && 60 % m == 0 => format!("1 */{} * * * *", m),
            m if m >= 60 && m < 1440 && m % 60 == 0 && 24 % (m / 60) == 0 => {
                format!("1 0 */{} * * *", m / 60)
            }
            1440 => "1 0 0 * * *".to_string(),
            m => return Err(ScheduleError::UnalignedResolution(m)),
        };

        let schedule = Schedule::from_str(&expr).map_err(|e| ScheduleError::InvalidCron {
            expr: expr.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { expr, schedule })
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// First run time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&now).next()
    }
}

/// Drives [`AnalysisRuntime::run_cycle`] on every scheduled tick.
pub struct JobScheduler {
    runtime: Arc<AnalysisRuntime>,
    schedule: CandleSchedule,
    error_backoff: Duration,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl JobScheduler {
    pub fn new(
        runtime: Arc<AnalysisRuntime>,
        schedule: CandleSchedule,
        error_backoff: Duration,
    ) -> Self {
        info!(cron = %schedule.expression(), "JobScheduler: created (cron: {})", schedule.expression());
        Self {
            runtime,
            schedule,
            error_backoff,
            handle: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();
        let error_backoff = self.error_backoff;

        let handle = tokio::spawn(async move {
            info!("JobScheduler: started, waiting for next candle close...");

            loop {
                let now = Utc::now();
                match schedule.next_after(now) {
                    Some(next) => {
                        let wait = (next - now).to_std().unwrap_or_default();
                        info!(
                            next_run = %next.format("%H:%M:%S"),
                            "Sleeping for {:.2} minutes until {} UTC...",
                            wait.as_secs_f64() / 60.0,
                            next.format("%H:%M:%S")
                        );
                        tokio::time::sleep(wait).await;
                    }
                    None => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        continue;
                    }
                }

                // Run the cycle on its own task so a panic is contained.
                let cycle_runtime = runtime.clone();
                let cycle = tokio::spawn(async move { cycle_runtime.run_cycle().await });
                if let Err(e) = cycle.await {
                    error!(error = %e, backoff_secs = error_backoff.as_secs(), "JobScheduler: analysis cycle aborted unexpectedly");
                    tokio::time::sleep(error_backoff).await;
                }
            }
        });

        *self.handle.write().await = Some(handle);
        info!("JobScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
