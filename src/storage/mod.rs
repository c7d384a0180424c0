// src/storage/mod.rs

//! SQLite-backed persistence: the raw article store and the generic
//! repository facade built over it.

pub mod articles;
pub mod repository;

use sqlx::sqlite::SqlitePool;

use crate::error::Result;
use crate::models::Article;

// Re-export the types most callers need
pub use repository::{Filter, QueryOptions, Repository, Upsert, Value};

/// Open a pool against the configured database and make sure the article
/// schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    articles::init_schema(&pool).await?;
    Ok(pool)
}

/// Convenience constructor for the article repository.
pub fn article_repository(pool: &SqlitePool) -> Repository<Article> {
    Repository::new(pool.clone())
}
