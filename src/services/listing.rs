// src/services/listing.rs

//! Listing page fetcher.
//!
//! Discovers candidate article ids from the news index page.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::utils::PageFetcher;

const LIST_SELECTOR: &str = "div.news-list.short";
const ITEM_SELECTOR: &str = "a.news-item";
const PLACEHOLDER_SELECTOR: &str = ".border";

/// Trailing numeric id before the extension, e.g. `/news/4321.html`.
fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.html$").expect("id pattern is valid"))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Fetch the listing page and return up to `max` candidate article ids.
///
/// A non-success fetch is an error; an absent listing container is not.
pub async fn fetch_candidate_ids(
    fetcher: &dyn PageFetcher,
    listing_url: &str,
    max: usize,
) -> Result<HashSet<i64>> {
    let html = fetcher.fetch(listing_url).await?;
    parse_candidate_ids(&html, max)
}

/// Extract candidate article ids from listing page markup.
///
/// Entries containing a `.border` element are placeholder slots, not
/// articles, and are skipped. Source markup changes degrade to an empty
/// set rather than an error.
pub fn parse_candidate_ids(html: &str, max: usize) -> Result<HashSet<i64>> {
    let list_sel = parse_selector(LIST_SELECTOR)?;
    let item_sel = parse_selector(ITEM_SELECTOR)?;
    let placeholder_sel = parse_selector(PLACEHOLDER_SELECTOR)?;

    let document = Html::parse_document(html);
    let Some(list) = document.select(&list_sel).next() else {
        return Ok(HashSet::new());
    };

    let mut ids = HashSet::new();
    for item in list.select(&item_sel) {
        if ids.len() >= max {
            break;
        }
        if item.select(&placeholder_sel).next().is_some() {
            continue;
        }
        let Some(href) = item.value().attr("href") else {
            continue;
        };
        if let Some(captures) = id_pattern().captures(href) {
            if let Ok(id) = captures[1].parse::<i64>() {
                ids.insert(id);
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_page(items: &str) -> String {
        format!(
            r#"<html><body>
            <div class="news-list short">{items}</div>
            </body></html>"#
        )
    }

    #[test]
    fn test_extracts_ids_from_hrefs() {
        let html = listing_page(
            r#"<a class="news-item" href="/news/101.html">One</a>
               <a class="news-item" href="/news/102.html">Two</a>
               <a class="news-item" href="/news/103.html">Three</a>"#,
        );
        let ids = parse_candidate_ids(&html, 20).unwrap();
        assert_eq!(ids, [101, 102, 103].into_iter().collect());
    }

    #[test]
    fn test_skips_placeholder_entries() {
        let html = listing_page(
            r#"<a class="news-item" href="/news/101.html">One</a>
               <a class="news-item" href="/news/102.html"><span class="border"></span>Ad</a>"#,
        );
        let ids = parse_candidate_ids(&html, 20).unwrap();
        assert_eq!(ids, [101].into_iter().collect());
    }

    #[test]
    fn test_respects_max_count() {
        let html = listing_page(
            r#"<a class="news-item" href="/news/1.html">a</a>
               <a class="news-item" href="/news/2.html">b</a>
               <a class="news-item" href="/news/3.html">c</a>"#,
        );
        let ids = parse_candidate_ids(&html, 2).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_missing_container_yields_empty_set() {
        let html = "<html><body><div class='other'></div></body></html>";
        let ids = parse_candidate_ids(html, 20).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_ignores_links_without_numeric_id() {
        let html = listing_page(
            r#"<a class="news-item" href="/news/about.html">About</a>
               <a class="news-item" href="/news/77.html">Ok</a>
               <a class="news-item">No href</a>"#,
        );
        let ids = parse_candidate_ids(&html, 20).unwrap();
        assert_eq!(ids, [77].into_iter().collect());
    }
}
