// src/utils/url.rs

//! URL manipulation utilities.

/// Resolve a potentially relative `href` against a base URL.
///
/// Returns `None` when the base itself does not parse; an unparseable
/// href falls back to being returned as-is only when already absolute.
pub fn resolve(base: &str, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base = url::Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_passthrough() {
        assert_eq!(
            resolve("https://site.test/news/", "https://cdn.test/img.png"),
            Some("https://cdn.test/img.png".to_string())
        );
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve("https://site.test/news/", "img/photo.png"),
            Some("https://site.test/news/img/photo.png".to_string())
        );
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve("https://site.test/news/index.html", "/static/a.png"),
            Some("https://site.test/static/a.png".to_string())
        );
    }

    #[test]
    fn test_resolve_bad_base() {
        assert_eq!(resolve("not a url", "img.png"), None);
    }
}
