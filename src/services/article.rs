// src/services/article.rs

//! Detail page fetcher and parser.
//!
//! Turns one article's detail page into a [`NewArticle`]. Persistence is
//! the orchestrator's job, not this module's.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, NewArticle};
use crate::utils::{url, PageFetcher};

const TITLE_SELECTOR: &str = "div.article-title";
const BODY_BLOCK_SELECTOR: &str = "div.article-text";
const IMAGE_SELECTOR: &str = "img";
const PARAGRAPH_SELECTOR: &str = "span.article-body p";

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Substitute the article id into the configured detail URL template.
pub fn detail_url(template: &str, news_id: i64) -> String {
    template.replace("{id}", &news_id.to_string())
}

/// Fetch and parse one article's detail page.
pub async fn fetch_and_parse(
    fetcher: &dyn PageFetcher,
    config: &CrawlerConfig,
    news_id: i64,
) -> Result<NewArticle> {
    let url = detail_url(&config.detail_url_template, news_id);
    let html = fetcher.fetch(&url).await?;
    parse_article(&html, news_id, &config.listing_url)
}

/// Parse detail page markup into a record.
///
/// The title is mandatory; a missing image is not. Image links resolve
/// absolute against the listing page URL.
pub fn parse_article(html: &str, news_id: i64, base_url: &str) -> Result<NewArticle> {
    let title_sel = parse_selector(TITLE_SELECTOR)?;
    let body_block_sel = parse_selector(BODY_BLOCK_SELECTOR)?;
    let image_sel = parse_selector(IMAGE_SELECTOR)?;
    let paragraph_sel = parse_selector(PARAGRAPH_SELECTOR)?;

    let document = Html::parse_document(html);

    let title: String = document
        .select(&title_sel)
        .next()
        .ok_or_else(|| AppError::parse(format!("article {news_id} has no title element")))?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let image = document
        .select(&body_block_sel)
        .next()
        .and_then(|block| block.select(&image_sel).next())
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| url::resolve(base_url, src));

    let body = document
        .select(&paragraph_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    // The store requires a non-empty body; an empty one means the body
    // span is missing or holds no text, which is a structural failure of
    // this page only, not of the whole cycle.
    if body.is_empty() {
        return Err(AppError::parse(format!(
            "article {news_id} has no body text"
        )));
    }

    Ok(NewArticle {
        news_id,
        title,
        image,
        body,
    })
}
