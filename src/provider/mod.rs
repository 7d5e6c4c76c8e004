//! Content providers: node identity, text and neighbors of articles.

pub mod html;
pub mod memory;
pub mod rest;
pub mod sql;

pub use memory::MemoryProvider;
pub use rest::RestProvider;
pub use sql::SqlProvider;

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cache::SummaryCache;
use crate::config::{Config, ProviderKind};
use crate::error::{Result, WikiracerError};
use crate::title::normalize;

/// Deduplicated neighbor titles of one article, in a stable order.
pub type Links = BTreeSet<String>;

/// Source of article content for the search engine and heuristics.
///
/// `load` must complete before any other call. Everything else may be called
/// from one search at a time; implementations that are safe to share across
/// concurrent searches say so in their own docs.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// One-time, potentially slow initialization.
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    /// Canonical title of an article; [`WikiracerError::NotFound`] when the
    /// title cannot be canonicalized.
    async fn canonical_name(&self, title: &str) -> Result<String>;

    /// Article text and its deduplicated neighbor titles. Follows redirects.
    async fn text_and_links(&self, title: &str) -> Result<(String, Links)>;

    /// Bulk summary fetch. Titles whose summary cannot be fetched are simply
    /// absent from the result.
    async fn summaries(&self, titles: &Links) -> HashMap<String, String>;

    /// True iff the title resolves to a canonical name.
    async fn is_valid_article(&self, title: &str) -> bool {
        match self.canonical_name(title).await {
            Ok(_) => true,
            Err(e) => {
                if !e.is_not_found() {
                    log::warn!("Treating {} as invalid after lookup failure: {}", title, e);
                }
                false
            }
        }
    }

    /// True iff both titles denote the same article (canonical equality).
    async fn is_same_node(&self, a: &str, b: &str) -> bool {
        match (self.canonical_name(a).await, self.canonical_name(b).await) {
            (Ok(x), Ok(y)) => x == y,
            _ => normalize(a) == normalize(b),
        }
    }

    /// A random article title, for sampling jobs.
    async fn random_title(&self) -> Result<String> {
        Err(WikiracerError::Unsupported(
            "this provider cannot sample random pages".to_string(),
        ))
    }
}

/// Canonicalize raw link targets through `provider`, merging aliases of one
/// article into a single neighbor. Targets that do not resolve are kept as
/// written; the engine drops them when it finds they are not valid articles.
pub async fn canonical_links<P>(provider: &P, targets: Links) -> Result<Links>
where
    P: ContentProvider + ?Sized,
{
    let mut links = Links::new();
    for target in targets {
        match provider.canonical_name(&target).await {
            Ok(canonical) => {
                links.insert(canonical);
            }
            Err(e) if e.is_not_found() => {
                links.insert(target);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(links)
}

/// Build the provider selected in `config`. The caller still has to `load` it.
pub fn build(config: &Config) -> Result<Arc<dyn ContentProvider>> {
    let provider: Arc<dyn ContentProvider> = match config.provider.kind {
        ProviderKind::Rest => {
            let cache = Arc::new(SummaryCache::new(config.rest.summary_cache_capacity));
            Arc::new(RestProvider::new(&config.rest, cache)?)
        }
        ProviderKind::Sql => Arc::new(SqlProvider::new(&config.sql.db_path)),
        ProviderKind::Memory => {
            let path = config.memory.graph_path.as_ref().ok_or_else(|| {
                WikiracerError::Config(
                    "memory provider needs memory.graph_path (or --graph)".to_string(),
                )
            })?;
            Arc::new(MemoryProvider::from_json_file(path)?)
        }
    };
    log::debug!("Using {:?} content provider", config.provider.kind);
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl ContentProvider for Fixed {
        async fn canonical_name(&self, title: &str) -> Result<String> {
            match title {
                "Bat" | "bat" => Ok("Bat".to_string()),
                _ => Err(WikiracerError::NotFound(title.to_string())),
            }
        }

        async fn text_and_links(&self, _title: &str) -> Result<(String, Links)> {
            Ok((String::new(), Links::new()))
        }

        async fn summaries(&self, _titles: &Links) -> HashMap<String, String> {
            HashMap::new()
        }
    }

    #[tokio::test]
    async fn test_random_title_defaults_to_unsupported() {
        assert!(matches!(
            Fixed.random_title().await,
            Err(WikiracerError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_canonical_links_merge_and_keep_unresolved() {
        let targets: Links = ["Bat", "bat", "Owl"].iter().map(|s| s.to_string()).collect();
        let links = canonical_links(&Fixed, targets).await.unwrap();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(links, vec!["Bat", "Owl"]);
    }

    #[test]
    fn test_build_memory_without_graph_fails() {
        let mut config = Config::default();
        config.provider.kind = ProviderKind::Memory;
        let err = build(&config).err().unwrap();
        assert!(matches!(err, WikiracerError::Config(_)));
    }

    #[test]
    fn test_build_rest_and_sql() {
        let mut config = Config::default();
        assert!(build(&config).is_ok());

        config.provider.kind = ProviderKind::Sql;
        assert!(build(&config).is_ok());
    }
}
