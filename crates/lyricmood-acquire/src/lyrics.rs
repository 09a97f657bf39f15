use crate::http::PageFetcher;
use anyhow::{Context, Result};
use scraper::{Html, Node, Selector};
use std::collections::BTreeMap;
use std::ops::Deref;

/// Lyrics page for a slug. `{slug}` is replaced by [`slugify`] output.
pub const DEFAULT_URL_TEMPLATE: &str = "https://genius.com/Billie-eilish-{slug}-lyrics";

/// Titles whose lyrics page slug can't be derived mechanically.
/// Marker substring of the title → slug fragment that replaces it.
const BUILTIN_OVERRIDES: &[(&str, &str)] = &[("&Burn", "and-vince-staples-burn")];

/// Override table applied to a title before slugging.
///
/// Each entry replaces an exact, case-sensitive substring of the title.
/// An entry whose key is a whole title therefore maps that title to a
/// full slug.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugOverrides {
    entries: Vec<(String, String)>,
}

impl Default for SlugOverrides {
    fn default() -> Self {
        Self {
            entries: BUILTIN_OVERRIDES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SlugOverrides {
    /// Built-in table plus extra entries; extras win on a key clash.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut overrides = Self::default();
        for (marker, replacement) in extra {
            overrides.insert(marker, replacement);
        }
        overrides
    }

    pub fn insert(&mut self, marker: &str, replacement: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == marker) {
            Some(entry) => entry.1 = replacement.to_string(),
            None => self.entries.push((marker.to_string(), replacement.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every entry whose marker occurs in `title`.
    pub fn apply(&self, title: &str) -> String {
        let mut out = title.to_string();
        for (marker, replacement) in &self.entries {
            if out.contains(marker.as_str()) {
                tracing::debug!(title = %title, marker = %marker, "Applying slug override");
                out = out.replace(marker.as_str(), replacement);
            }
        }
        out
    }
}

/// Lowercase, hyphenate spaces, drop `!` and `'`.
pub fn slugify(title: &str) -> String {
    title
        .replace(' ', "-")
        .replace(['!', '\''], "")
        .to_lowercase()
}

/// Full slug for a title: overrides first, then [`slugify`].
pub fn title_slug(title: &str, overrides: &SlugOverrides) -> String {
    slugify(&overrides.apply(title))
}

pub fn lyrics_url(template: &str, slug: &str) -> String {
    template.replace("{slug}", slug)
}

/// Lyrics for one successfully fetched song.
#[derive(Debug, Clone, PartialEq)]
pub struct SongLyrics {
    pub title: String,
    pub lyrics: String,
}

/// Result of fetching one lyrics page.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(String),
    /// The page answered with a non-success status. The song is skipped.
    Failed { status: u16 },
}

/// Fetch and extract the lyrics for one title.
///
/// A non-success status is not an error: it is logged and reported as
/// [`FetchOutcome::Failed`] so the batch can carry on. Transport errors and
/// pages without a lyrics container are errors.
pub async fn fetch_lyrics<F: PageFetcher>(
    fetcher: &F,
    template: &str,
    overrides: &SlugOverrides,
    title: &str,
) -> Result<FetchOutcome> {
    let url = lyrics_url(template, &title_slug(title, overrides));
    let page = fetcher.get(&url).await?;

    if !page.is_success() {
        tracing::warn!(title = %title, status = page.status, url = %page.url, "Failed to fetch \"{title}\"");
        return Ok(FetchOutcome::Failed { status: page.status });
    }
    tracing::info!(title = %title, "Fetched \"{title}\"");

    let lyrics = extract_lyrics(&page.body)
        .with_context(|| format!("Could not extract lyrics for \"{title}\" from {url}"))?;
    tracing::info!(title = %title, lines = lyrics.lines().count(), "Stored lyrics for \"{title}\"");
    Ok(FetchOutcome::Fetched(lyrics))
}

/// Fetch lyrics for every title in order, keeping only the successes.
pub async fn fetch_all<F: PageFetcher>(
    fetcher: &F,
    template: &str,
    overrides: &SlugOverrides,
    titles: &[String],
) -> Result<Vec<SongLyrics>> {
    let mut songs = Vec::with_capacity(titles.len());
    let mut failed = 0;

    for title in titles {
        match fetch_lyrics(fetcher, template, overrides, title).await? {
            FetchOutcome::Fetched(lyrics) => songs.push(SongLyrics {
                title: title.clone(),
                lyrics,
            }),
            FetchOutcome::Failed { .. } => failed += 1,
        }
    }

    tracing::info!(fetched = songs.len(), failed, "Finished fetching lyrics");
    Ok(songs)
}

/// Text of the first paragraph inside the first `.lyrics` container.
///
/// `<br>` is rendered as a line break.
pub fn extract_lyrics(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse(".lyrics").expect("valid selector");
    let p_sel = Selector::parse("p").expect("valid selector");

    let container = document
        .select(&container_sel)
        .next()
        .context("Could not find .lyrics container")?;
    let paragraph = container
        .select(&p_sel)
        .next()
        .context("Could not find a paragraph in .lyrics")?;

    let mut text = String::new();
    let mut after_br = false;
    collect_text(paragraph.id(), paragraph.tree(), &mut text, &mut after_br);
    Ok(text)
}

/// Collect all text under a node, turning `<br>` into `\n`.
///
/// Markup often has a literal newline right after each `<br>`; that one is
/// folded into the break instead of producing an empty line.
fn collect_text(
    node_id: ego_tree::NodeId,
    tree: &ego_tree::Tree<Node>,
    text: &mut String,
    after_br: &mut bool,
) {
    let node = tree.get(node_id).expect("valid node id");

    for child in node.children() {
        match child.value() {
            Node::Text(t) => {
                let mut s: &str = t.deref();
                if *after_br {
                    s = s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n')).unwrap_or(s);
                }
                if !s.is_empty() {
                    *after_br = false;
                }
                text.push_str(s);
            }
            Node::Element(elem) => match elem.name() {
                "br" => {
                    text.push('\n');
                    *after_br = true;
                }
                "script" | "style" => {}
                _ => collect_text(child.id(), tree, text, after_br),
            },
            _ => {}
        }
    }
}
