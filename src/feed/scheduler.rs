//! Background fetch scheduler.
//!
//! A single control loop that runs production ingestion once at startup and
//! again at a fixed interval. Runs never overlap: a run that outlasts the
//! interval simply delays the next tick.

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use super::engine::IngestEngine;
use super::fetcher::FetchFeed;
use crate::config::FetchConfig;

/// Periodic driver for background ingestion.
pub struct FetchScheduler<F> {
    engine: IngestEngine<F>,
    interval: Duration,
}

impl<F> FetchScheduler<F>
where
    F: FetchFeed + Clone + 'static,
{
    /// Create a scheduler from configuration.
    ///
    /// The interval is normalized through
    /// [`FetchConfig::effective_interval_secs`], so invalid values fall back
    /// to the default.
    pub fn new(engine: IngestEngine<F>, config: &FetchConfig) -> Self {
        Self::with_interval(engine, config.effective_interval_secs())
    }

    /// Create a scheduler with an explicit interval in seconds.
    pub fn with_interval(engine: IngestEngine<F>, interval_secs: u64) -> Self {
        Self {
            engine,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the scheduler loop indefinitely.
    ///
    /// The first tick completes immediately, so ingestion runs once at
    /// startup before settling into the interval.
    pub async fn run(&self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "background feed fetcher started"
        );

        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            let stats = self.engine.run_production_ingestion().await;
            info!(
                created = stats.created,
                updated = stats.updated,
                errors = stats.errors,
                "background feed fetch completed"
            );
        }
    }
}

/// Spawn the scheduler as a background task.
pub fn start_scheduler<F>(engine: IngestEngine<F>, config: &FetchConfig)
where
    F: FetchFeed + Clone + Send + 'static,
{
    let scheduler = FetchScheduler::new(engine, config);
    tokio::spawn(async move {
        scheduler.run().await;
    });
}
