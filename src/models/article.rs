// src/models/article.rs

//! Scraped article records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::repository::Entity;

/// A persisted article. Append-only: never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    /// Surrogate primary key, assigned by the store in discovery order
    pub id: i64,

    /// The source site's identifier for the article
    pub news_id: i64,

    /// Article title
    pub title: String,

    /// Absolute image URL, absent when the page has no image
    pub image: Option<String>,

    /// Concatenated paragraph text
    pub body: String,

    /// When the article was scraped
    pub fetched_at: DateTime<Utc>,
}

impl Entity for Article {
    const TABLE: &'static str = "articles";
    const COLUMNS: &'static [&'static str] =
        &["id", "news_id", "title", "image", "body", "fetched_at"];
    const PRIMARY_KEY: &'static str = "id";
}

/// An article as produced by the detail parser, before it has a row id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub news_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub body: String,
}
