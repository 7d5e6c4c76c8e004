//! In-memory article graph, loadable from a JSON fixture file.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{canonical_links, ContentProvider, Links};
use crate::error::{Result, WikiracerError};
use crate::resolve::{NameResolver, PageKind, TitleLookup};
use crate::wikitext;

#[derive(Debug, Clone, Default, Deserialize)]
struct GraphFile {
    #[serde(default)]
    articles: HashMap<String, ArticleSpec>,
    #[serde(default)]
    redirects: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ArticleSpec {
    #[serde(default)]
    text: String,
    #[serde(default)]
    links: Vec<String>,
}

/// A fixed article graph held in memory.
///
/// Titles are stored exactly as given; canonicalization goes through
/// [`NameResolver`] like the storage-backed providers. Safe to share across
/// concurrent searches. Sampling is deterministic: `random_title` walks the
/// articles in title order and wraps around.
///
/// JSON format:
///
/// ```json
/// {
///   "articles": { "Bat": { "text": "Bats are mammals.", "links": ["Mammal"] } },
///   "redirects": { "Bats": "Bat" }
/// }
/// ```
#[derive(Default)]
pub struct MemoryProvider {
    articles: HashMap<String, ArticleSpec>,
    redirects: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
    sample_cursor: AtomicUsize,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            WikiracerError::Parse(msg) => {
                WikiracerError::Parse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let graph: GraphFile =
            serde_json::from_str(content).map_err(|e| WikiracerError::Parse(e.to_string()))?;
        Ok(Self {
            articles: graph.articles,
            redirects: graph.redirects,
            fetches: Mutex::new(HashMap::new()),
            sample_cursor: AtomicUsize::new(0),
        })
    }

    /// Add an article with its outgoing links
    pub fn with_article(mut self, title: &str, text: &str, links: &[&str]) -> Self {
        self.articles.insert(
            title.to_string(),
            ArticleSpec {
                text: text.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    /// Add a redirect page
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// How many times `text_and_links` fetched this canonical title.
    pub fn fetch_count(&self, title: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(title)
            .copied()
            .unwrap_or(0)
    }

    /// Total `text_and_links` fetches across all titles.
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

/// First paragraph of an article's text.
fn first_paragraph(text: &str) -> String {
    text.split("\n\n").next().unwrap_or("").trim().to_string()
}

#[async_trait]
impl TitleLookup for MemoryProvider {
    async fn lookup(&self, title: &str) -> Result<PageKind> {
        if self.articles.contains_key(title) {
            Ok(PageKind::Article)
        } else if let Some(target) = self.redirects.get(title) {
            Ok(PageKind::Redirect(target.clone()))
        } else {
            Ok(PageKind::Missing)
        }
    }
}

#[async_trait]
impl ContentProvider for MemoryProvider {
    async fn load(&self) -> Result<()> {
        log::info!(
            "In-memory graph ready: {} articles, {} redirects",
            self.article_count(),
            self.redirects.len()
        );
        Ok(())
    }

    async fn canonical_name(&self, title: &str) -> Result<String> {
        NameResolver::new(self).resolve(title).await
    }

    async fn text_and_links(&self, title: &str) -> Result<(String, Links)> {
        let canonical = self.canonical_name(title).await?;
        let article = self
            .articles
            .get(&canonical)
            .ok_or_else(|| WikiracerError::NotFound(canonical.clone()))?;

        *self
            .fetches
            .lock()
            .unwrap()
            .entry(canonical.clone())
            .or_insert(0) += 1;

        let targets = article
            .links
            .iter()
            .filter_map(|l| wikitext::link_target(l))
            .collect();
        let links = canonical_links(self, targets).await?;
        Ok((article.text.clone(), links))
    }

    async fn summaries(&self, titles: &Links) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for title in titles {
            match self.canonical_name(title).await {
                Ok(canonical) => {
                    if let Some(article) = self.articles.get(&canonical) {
                        out.insert(title.clone(), first_paragraph(&article.text));
                    }
                }
                Err(e) => log::debug!("No summary for {}: {}", title, e),
            }
        }
        out
    }

    async fn random_title(&self) -> Result<String> {
        let mut titles: Vec<&String> = self.articles.keys().collect();
        if titles.is_empty() {
            return Err(WikiracerError::NotFound("graph has no articles".to_string()));
        }
        titles.sort();
        let i = self.sample_cursor.fetch_add(1, Ordering::Relaxed) % titles.len();
        Ok(titles[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryProvider {
        MemoryProvider::new()
            .with_article(
                "Bat",
                "Bats are flying mammals.\n\nThey eat insects.",
                &["Mammal", "Insect#Diet", "", "Mammal"],
            )
            .with_article("Mammal", "Mammals are vertebrates.", &[])
            .with_redirect("Bats", "Bat")
    }

    #[tokio::test]
    async fn test_links_deduplicated_and_cleaned() {
        let provider = sample();
        let (text, links) = provider.text_and_links("Bat").await.unwrap();
        assert!(text.starts_with("Bats are"));
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(links, vec!["Insect", "Mammal"]);
    }

    #[tokio::test]
    async fn test_alias_links_merge_into_one_neighbor() {
        let provider = MemoryProvider::new()
            .with_article("A", "", &["Bat", "bat", "Bats", "Nowhere"])
            .with_article("Bat", "", &[])
            .with_redirect("Bats", "Bat");
        let (_, links) = provider.text_and_links("A").await.unwrap();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(links, vec!["Bat", "Nowhere"]);
    }

    #[tokio::test]
    async fn test_text_and_links_follows_redirects() {
        let provider = sample();
        let (_, links) = provider.text_and_links("bats").await.unwrap();
        assert!(links.contains("Mammal"));
        assert_eq!(provider.fetch_count("Bat"), 1);
    }

    #[tokio::test]
    async fn test_validity_and_identity() {
        let provider = sample();
        assert!(provider.is_valid_article("bat").await);
        assert!(!provider.is_valid_article("Insect").await);
        assert!(provider.is_same_node("Bats", "Bat").await);
        assert!(!provider.is_same_node("Bat", "Mammal").await);
    }

    #[tokio::test]
    async fn test_summaries_omit_missing() {
        let provider = sample();
        let titles: Links = ["Bats", "Insect"].iter().map(|s| s.to_string()).collect();
        let summaries = provider.summaries(&titles).await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries["Bats"], "Bats are flying mammals.");
    }

    #[tokio::test]
    async fn test_random_title_cycles_articles() {
        let provider = sample();
        let mut drawn = Vec::new();
        for _ in 0..3 {
            drawn.push(provider.random_title().await.unwrap());
        }
        assert_eq!(drawn, vec!["Bat", "Mammal", "Bat"]);

        let empty = MemoryProvider::new();
        assert!(empty.random_title().await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_json_str() {
        let provider = MemoryProvider::from_json_str(
            r#"{"articles": {"A": {"links": ["B"]}, "B": {}}, "redirects": {"Alpha": "A"}}"#,
        )
        .unwrap();
        assert_eq!(provider.article_count(), 2);
        assert!(MemoryProvider::from_json_str("{not json").is_err());
    }
}
