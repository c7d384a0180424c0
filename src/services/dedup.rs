// src/services/dedup.rs

//! Deduplication filter.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::Article;
use crate::storage::articles;
use crate::storage::Repository;

/// Remove every candidate id already present in the store.
///
/// One batched existence query regardless of candidate count.
pub async fn filter_new(
    candidates: &HashSet<i64>,
    repo: &Repository<Article>,
) -> Result<HashSet<i64>> {
    if candidates.is_empty() {
        return Ok(HashSet::new());
    }
    let present = articles::exists_by_news_ids(repo, candidates).await?;
    Ok(candidates.difference(&present).copied().collect())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::models::NewArticle;
    use crate::storage::articles::{init_schema, insert_all};

    async fn repo_with_ids(ids: &[i64]) -> Repository<Article> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        let batch: Vec<NewArticle> = ids
            .iter()
            .map(|id| NewArticle {
                news_id: *id,
                title: format!("Title {id}"),
                image: None,
                body: "Body".to_string(),
            })
            .collect();
        insert_all(&pool, &batch).await.unwrap();
        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_removes_known_ids() {
        let repo = repo_with_ids(&[101]).await;
        let candidates: HashSet<i64> = [101, 102, 103].into_iter().collect();
        let fresh = filter_new(&candidates, &repo).await.unwrap();
        assert_eq!(fresh, [102, 103].into_iter().collect());
    }

    #[tokio::test]
    async fn test_all_known_yields_empty() {
        let repo = repo_with_ids(&[1, 2, 3]).await;
        let candidates: HashSet<i64> = [1, 2, 3].into_iter().collect();
        let fresh = filter_new(&candidates, &repo).await.unwrap();
        assert!(fresh.is_empty());
    }

    #[tokio::test]
    async fn test_empty_candidates_short_circuit() {
        let repo = repo_with_ids(&[]).await;
        let fresh = filter_new(&HashSet::new(), &repo).await.unwrap();
        assert!(fresh.is_empty());
    }
}
