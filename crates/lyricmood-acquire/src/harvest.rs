use crate::http::PageFetcher;
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

const WIKI_BASE_URL: &str = "https://en.wikipedia.org/wiki";

/// Parenthetical suffixes on listing entries, e.g. "Lovely (song)".
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*\)").expect("valid regex"));

/// Resolve a category argument into a listing URL.
///
/// Full URLs are used as-is. Anything else is treated as a Wikipedia
/// category name, with or without the `Category:` prefix.
pub fn category_url(category: &str) -> String {
    let category = category.trim();
    if category.starts_with("http://") || category.starts_with("https://") {
        return category.to_string();
    }
    let name = category.strip_prefix("Category:").unwrap_or(category);
    format!("{WIKI_BASE_URL}/Category:{}", name.replace(' ', "_"))
}

/// Fetch a category listing page and return the song titles on it.
///
/// The listing page is a precondition for the whole run, so a transport
/// error or non-success status is returned as an error.
pub async fn harvest_titles<F: PageFetcher>(fetcher: &F, url: &str) -> Result<Vec<String>> {
    tracing::info!(url = %url, "Fetching category listing");
    let page = fetcher.get(url).await.context("Failed to fetch category page")?;
    anyhow::ensure!(page.is_success(), "HTTP {} for {}", page.status, page.url);

    let titles = parse_category_page(&page.body);
    tracing::info!(titles = titles.len(), "Harvested song titles");
    Ok(titles)
}

/// Extract titles from every link in every `.mw-category-group` block,
/// in document order.
pub fn parse_category_page(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let group_sel = Selector::parse(".mw-category-group").expect("valid selector");
    let link_sel = Selector::parse("a").expect("valid selector");

    let mut titles = Vec::new();
    for group in document.select(&group_sel) {
        for link in group.select(&link_sel) {
            let text: String = link.text().collect();
            let title = tidy_title(&text);
            if title.is_empty() {
                tracing::debug!(raw = %text, "Skipping empty link text");
                continue;
            }
            titles.push(title);
        }
    }
    titles
}

/// Drop any parenthetical annotation and surrounding whitespace.
pub fn tidy_title(raw: &str) -> String {
    PARENTHETICAL_RE.replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Page;

    struct OnePage(u16, &'static str);

    impl PageFetcher for OnePage {
        async fn get(&self, url: &str) -> Result<Page> {
            Ok(Page { url: url.to_string(), status: self.0, body: self.1.to_string() })
        }
    }

    const LISTING: &str = r#"
        <html><body>
        <div id="mw-pages">
          <h2>Pages in category "Billie Eilish songs"</h2>
          <div class="mw-category">
            <div class="mw-category-group"><h3>S</h3>
              <ul>
                <li><a href="/wiki/Song_One" title="Song One">Song One</a></li>
                <li><a href="/wiki/Song_Two_(Remix)" title="Song Two (Remix)">Song Two (Remix)</a></li>
              </ul>
            </div>
          </div>
        </div>
        <div class="catlinks"><a href="/wiki/Help:Category">Categories</a></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_category_page() {
        assert_eq!(parse_category_page(LISTING), vec!["Song One", "Song Two"]);
    }

    #[test]
    fn test_parse_multiple_groups_keeps_order() {
        let html = r#"
            <div class="mw-category-group"><h3>B</h3><ul>
              <li><a>Bad Guy</a></li><li><a>Bellyache</a></li></ul></div>
            <div class="mw-category-group"><h3>W</h3><ul>
              <li><a>When the Party's Over</a></li>
              <li><a>Wish You Were Gay (acoustic)</a></li></ul></div>
        "#;
        assert_eq!(
            parse_category_page(html),
            vec!["Bad Guy", "Bellyache", "When the Party's Over", "Wish You Were Gay"]
        );
    }

    #[test]
    fn test_tidy_title() {
        assert_eq!(tidy_title("  Lovely (song)  "), "Lovely");
        assert_eq!(tidy_title("Ocean Eyes"), "Ocean Eyes");
        assert_eq!(tidy_title("(Intro)"), "");
    }

    #[test]
    fn test_category_url() {
        assert_eq!(
            category_url("Billie Eilish songs"),
            "https://en.wikipedia.org/wiki/Category:Billie_Eilish_songs"
        );
        assert_eq!(
            category_url("Category:Billie_Eilish_songs"),
            "https://en.wikipedia.org/wiki/Category:Billie_Eilish_songs"
        );
        assert_eq!(category_url("https://example.com/list"), "https://example.com/list");
    }

    #[tokio::test]
    async fn test_harvest_titles() {
        let titles = harvest_titles(&OnePage(200, LISTING), "https://test").await.unwrap();
        assert_eq!(titles, vec!["Song One", "Song Two"]);
    }

    #[tokio::test]
    async fn test_harvest_fails_on_error_status() {
        let err = harvest_titles(&OnePage(503, ""), "https://test").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    /// Redirects to the login page, which then refuses access.
    struct Redirected;

    impl PageFetcher for Redirected {
        async fn get(&self, _url: &str) -> Result<Page> {
            Ok(Page { url: "https://test/login".into(), status: 403, body: String::new() })
        }
    }

    #[tokio::test]
    async fn test_harvest_error_names_final_url() {
        let err = harvest_titles(&Redirected, "https://test/list").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 403 for https://test/login");
    }
}
