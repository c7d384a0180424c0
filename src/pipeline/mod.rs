// src/pipeline/mod.rs

//! Scrape pipeline: the per-run orchestrator and its periodic trigger.

pub mod cycle;
pub mod recent;
pub mod scheduler;

pub use cycle::{run_cycle, CycleOutcome};
pub use recent::recent_articles;
pub use scheduler::run_scheduler;
