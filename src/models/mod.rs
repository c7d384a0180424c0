// src/models/mod.rs

//! Domain models for the scraper application.

mod article;
mod config;

// Re-export all public types
pub use article::{Article, NewArticle};
pub use config::{Config, CrawlerConfig, DatabaseConfig, LoggingConfig};
