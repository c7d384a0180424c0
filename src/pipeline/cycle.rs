// src/pipeline/cycle.rs

//! One scrape cycle: listing fetch, dedup, per-article detail fetch,
//! transactional commit.

use sqlx::sqlite::SqlitePool;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{article, dedup, listing};
use crate::storage;
use crate::storage::articles;
use crate::utils::PageFetcher;

/// Cycle progress, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    Idle,
    ListingFetched,
    Deduplicated,
    Detailing,
    Committing,
    Done,
    Failed,
}

fn transition(state: &mut CycleState, next: CycleState) {
    log::debug!("Cycle state: {:?} -> {:?}", state, next);
    *state = next;
}

/// Summary of one scrape cycle.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Candidate ids found on the listing page
    pub discovered: usize,
    /// Candidates not yet in the store
    pub new: usize,
    /// Records committed this cycle
    pub persisted: usize,
    /// Terminal error, when the cycle failed before its commit completed
    pub error: Option<AppError>,
}

impl CycleOutcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Run one scrape cycle.
///
/// A listing fetch/parse failure is fatal and persists nothing. A failure
/// on a single article is logged with its id and skips only that article.
/// All staged records are committed in one transaction at the end; a
/// failed commit persists nothing from this cycle. Always returns an
/// outcome so the caller can log counters even on failure.
pub async fn run_cycle(
    config: &Config,
    pool: &SqlitePool,
    fetcher: &dyn PageFetcher,
) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();
    let mut state = CycleState::Idle;

    if let Err(e) = run_stages(config, pool, fetcher, &mut state, &mut outcome).await {
        transition(&mut state, CycleState::Failed);
        log::error!("Scrape cycle failed: {e}");
        outcome.error = Some(e);
    }
    outcome
}

async fn run_stages(
    config: &Config,
    pool: &SqlitePool,
    fetcher: &dyn PageFetcher,
    state: &mut CycleState,
    outcome: &mut CycleOutcome,
) -> Result<()> {
    log::info!("Scrape cycle started");

    let candidates = listing::fetch_candidate_ids(
        fetcher,
        &config.crawler.listing_url,
        config.crawler.max_items_per_cycle,
    )
    .await?;
    transition(state, CycleState::ListingFetched);
    outcome.discovered = candidates.len();

    let repo = storage::article_repository(pool);
    let fresh = dedup::filter_new(&candidates, &repo).await?;
    transition(state, CycleState::Deduplicated);
    outcome.new = fresh.len();

    if fresh.is_empty() {
        transition(state, CycleState::Done);
        log::info!("No new articles");
        return Ok(());
    }

    transition(state, CycleState::Detailing);
    let mut staged = Vec::with_capacity(fresh.len());
    for news_id in &fresh {
        match article::fetch_and_parse(fetcher, &config.crawler, *news_id).await {
            Ok(parsed) => staged.push(parsed),
            Err(e) => log::warn!("Skipping article {news_id}: {e}"),
        }
    }

    transition(state, CycleState::Committing);
    outcome.persisted = articles::insert_all(pool, &staged).await? as usize;
    transition(state, CycleState::Done);

    log::info!(
        "Scrape cycle complete: discovered={}, new={}, persisted={}",
        outcome.discovered,
        outcome.new,
        outcome.persisted
    );
    Ok(())
}
