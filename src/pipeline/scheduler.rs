// src/pipeline/scheduler.rs

//! Periodic cycle trigger.
//!
//! Fires one scrape cycle per configured interval, first run immediate.
//! An atomic in-flight flag enforces at most one concurrent cycle: a tick
//! that lands while a cycle is still running is skipped with a warning
//! instead of piling up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePool;
use tokio::time::{self, MissedTickBehavior};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::cycle;
use crate::utils::HttpFetcher;

/// Run the scrape scheduler until the process is stopped.
pub async fn run_scheduler(config: Config, pool: SqlitePool) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config.crawler)?);
    let config = Arc::new(config);
    let running = Arc::new(AtomicBool::new(false));

    let mut interval = time::interval(Duration::from_secs(config.crawler.fetch_interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "Scheduler started: one cycle every {}s",
        config.crawler.fetch_interval_secs
    );

    loop {
        interval.tick().await;

        if running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("Previous cycle still running, skipping this tick");
            continue;
        }

        let config = Arc::clone(&config);
        let pool = pool.clone();
        let fetcher = Arc::clone(&fetcher);
        let running = Arc::clone(&running);
        tokio::spawn(async move {
            let outcome = cycle::run_cycle(&config, &pool, fetcher.as_ref()).await;
            if outcome.is_failure() {
                log::warn!(
                    "Cycle ended in failure after discovering {} candidates",
                    outcome.discovered
                );
            }
            running.store(false, Ordering::SeqCst);
        });
    }
}
