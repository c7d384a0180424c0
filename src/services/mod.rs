// src/services/mod.rs

//! Scraping services: listing discovery, dedup and detail parsing.

pub mod article;
pub mod dedup;
pub mod listing;
