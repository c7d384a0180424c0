// src/storage/articles.rs

//! Article schema and raw storage primitives.
//!
//! The store is append-only: inserts only, no updates. Transaction
//! boundaries belong to the caller; the one exception is [`insert_all`],
//! which is the cycle-commit primitive and wraps its batch itself.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;

use crate::error::{AppError, Result};
use crate::models::{Article, NewArticle};
use crate::storage::repository::{Filter, Repository, Value};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS articles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    news_id     INTEGER NOT NULL,
    title       TEXT NOT NULL,
    image       TEXT,
    body        TEXT NOT NULL,
    fetched_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_articles_news_id ON articles (news_id);
";

/// Create the articles table and its index if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

fn check_required(article: &NewArticle) -> Result<()> {
    if article.title.trim().is_empty() {
        return Err(AppError::constraint(format!(
            "article {} has an empty title",
            article.news_id
        )));
    }
    if article.body.trim().is_empty() {
        return Err(AppError::constraint(format!(
            "article {} has an empty body",
            article.news_id
        )));
    }
    Ok(())
}

async fn insert_row<'e, E>(
    executor: E,
    article: &NewArticle,
    fetched_at: DateTime<Utc>,
) -> Result<i64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO articles (news_id, title, image, body, fetched_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(article.news_id)
    .bind(&article.title)
    .bind(&article.image)
    .bind(&article.body)
    .bind(fetched_at)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Insert one article, stamping `fetched_at` with the insertion time.
///
/// Fails with a constraint error when a required field is empty.
pub async fn insert(pool: &SqlitePool, article: &NewArticle) -> Result<Article> {
    check_required(article)?;
    let fetched_at = Utc::now();
    let id = insert_row(pool, article, fetched_at).await?;
    Ok(Article {
        id,
        news_id: article.news_id,
        title: article.title.clone(),
        image: article.image.clone(),
        body: article.body.clone(),
        fetched_at,
    })
}

/// Insert a batch of articles in one transaction, all or nothing.
///
/// Returns the number of rows written. A constraint violation on any
/// record rolls back the whole batch.
pub async fn insert_all(pool: &SqlitePool, articles: &[NewArticle]) -> Result<u64> {
    let fetched_at = Utc::now();
    let mut tx = pool.begin().await?;
    for article in articles {
        check_required(article)?;
        insert_row(&mut *tx, article, fetched_at).await?;
    }
    tx.commit().await?;
    Ok(articles.len() as u64)
}

/// Which of the given source ids are already stored.
///
/// One batched `news_id IN (...)` query projecting only the id column,
/// regardless of how many candidates are passed.
pub async fn exists_by_news_ids(
    repo: &Repository<Article>,
    news_ids: &HashSet<i64>,
) -> Result<HashSet<i64>> {
    let values = news_ids.iter().map(|id| Value::Int(*id)).collect();
    let present = repo
        .pluck_i64("news_id", &[Filter::In("news_id", values)])
        .await?;
    Ok(present.into_iter().collect())
}
