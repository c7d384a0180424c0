// src/lib.rs

//! newscrawl library: incremental news scraping over a SQLite-backed
//! generic repository.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
