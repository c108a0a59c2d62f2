//! Cron-style maintenance jobs using tokio-cron-scheduler.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use coulisses_core::ports::RateLimiter;
#[cfg(feature = "throttle")]
use coulisses_infra::RequestThrottle;

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    enabled: bool,
}

impl Scheduler {
    /// Create a new scheduler.
    pub async fn new(enabled: bool) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, enabled })
    }

    /// Add a cron job running a synchronous task.
    pub async fn add_cron<F>(&self, schedule: &str, task: F) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() + Send + Sync + Clone + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task();
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

/// Register the job evicting expired rate limit state.
pub async fn register_rate_limit_sweep(
    scheduler: &Scheduler,
    schedule: &str,
    limiter: Arc<dyn RateLimiter>,
    #[cfg(feature = "throttle")] throttle: Option<Arc<RequestThrottle>>,
) -> Result<uuid::Uuid, JobSchedulerError> {
    scheduler
        .add_cron(schedule, move || {
            let removed = limiter.purge_expired();
            tracing::debug!(removed, "Rate limit sweep finished");

            #[cfg(feature = "throttle")]
            if let Some(throttle) = &throttle {
                throttle.retain_recent();
            }
        })
        .await
}
