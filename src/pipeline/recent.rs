// src/pipeline/recent.rs

//! Read-side query surface: the most recently discovered articles.

use sqlx::sqlite::SqlitePool;

use crate::error::Result;
use crate::models::Article;
use crate::storage::{self, QueryOptions};

/// Fetch the most recent `limit` articles, newest first by primary key.
pub async fn recent_articles(pool: &SqlitePool, limit: i64) -> Result<Vec<Article>> {
    let repo = storage::article_repository(pool);
    let opts = QueryOptions {
        limit: Some(limit),
        order_by: Some("id"),
        descending: true,
        ..QueryOptions::default()
    };
    repo.get_many(&[], &opts).await
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::models::NewArticle;
    use crate::storage::articles::{init_schema, insert_all};

    #[tokio::test]
    async fn test_recent_is_newest_first_and_capped() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();

        let batch: Vec<NewArticle> = (1..=5)
            .map(|id| NewArticle {
                news_id: id,
                title: format!("Title {id}"),
                image: None,
                body: "Body".to_string(),
            })
            .collect();
        insert_all(&pool, &batch).await.unwrap();

        let recent = recent_articles(&pool, 3).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|a| a.news_id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}
