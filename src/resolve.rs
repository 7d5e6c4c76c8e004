//! Canonical-name resolution: redirect following plus capitalization variants.
//!
//! Resolution is a bounded depth-first search over a small graph whose edges
//! are redirects and capitalization variants. Every recursive step carries a
//! blacklist extended with the title it came from, so a chain that loops back
//! to a title already tried in the same resolution fails instead of spinning.

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::{Result, WikiracerError};
use crate::title::{name_variants, normalize};

/// What a storage backend knows about a single exact title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// A real article; the title is canonical.
    Article,
    /// A redirect page pointing at the contained (raw) title.
    Redirect(String),
    /// No page with this exact title.
    Missing,
}

/// Exact-title lookup used by [`NameResolver`].
///
/// Implementations must not normalize or re-case the title they are given;
/// that is the resolver's job.
#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<PageKind>;
}

/// Titles already attempted in the current resolution chain.
///
/// Never mutated in place: each recursive step gets its own extended copy, so
/// sibling variant attempts do not see each other's entries.
#[derive(Debug, Clone, Default)]
pub struct Blacklist(Vec<String>);

impl Blacklist {
    pub fn contains(&self, title: &str) -> bool {
        self.0.iter().any(|t| t == title)
    }

    /// A new blacklist with `title` appended.
    pub fn extended(&self, title: &str) -> Blacklist {
        let mut titles = self.0.clone();
        titles.push(title.to_string());
        Blacklist(titles)
    }
}

/// Resolves raw user-typed titles to canonical article titles.
pub struct NameResolver<'a, L: TitleLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: TitleLookup + ?Sized> NameResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Resolve `raw_title` to its canonical form.
    ///
    /// Fails with [`WikiracerError::NotFound`] once redirects and variants are
    /// exhausted. Backend errors other than "not found" abort the resolution.
    pub async fn resolve(&self, raw_title: &str) -> Result<String> {
        self.resolve_with(raw_title.to_string(), true, Blacklist::default())
            .await
    }

    fn resolve_with(
        &self,
        raw_title: String,
        try_variants: bool,
        blacklist: Blacklist,
    ) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let title = normalize(&raw_title);
            if blacklist.contains(&title) {
                return Err(WikiracerError::NotFound(format!(
                    "{} (already tried in this resolution chain)",
                    title
                )));
            }

            match self.lookup.lookup(&title).await? {
                PageKind::Article => Ok(title),
                PageKind::Redirect(target) => {
                    log::debug!("{} redirects to {}", title, target);
                    self.resolve_with(target, true, blacklist.extended(&title))
                        .await
                }
                PageKind::Missing => {
                    if try_variants {
                        for variant in name_variants(&title) {
                            match self
                                .resolve_with(variant, false, blacklist.extended(&title))
                                .await
                            {
                                Ok(name) => return Ok(name),
                                Err(e) if e.is_not_found() => continue,
                                Err(e) => return Err(e),
                            }
                        }
                    }
                    Err(WikiracerError::NotFound(title))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapLookup {
        pages: HashMap<String, PageKind>,
        calls: AtomicUsize,
    }

    impl MapLookup {
        fn new(pages: &[(&str, PageKind)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(t, k)| (t.to_string(), k.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TitleLookup for MapLookup {
        async fn lookup(&self, title: &str) -> Result<PageKind> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.get(title).cloned().unwrap_or(PageKind::Missing))
        }
    }

    fn redirect(target: &str) -> PageKind {
        PageKind::Redirect(target.to_string())
    }

    #[tokio::test]
    async fn test_existing_article_unchanged() {
        let lookup = MapLookup::new(&[("Bat", PageKind::Article)]);
        let name = NameResolver::new(&lookup).resolve("Bat").await.unwrap();
        assert_eq!(name, "Bat");
    }

    #[tokio::test]
    async fn test_underscores_become_spaces() {
        let lookup = MapLookup::new(&[("British Empire", PageKind::Article)]);
        let name = NameResolver::new(&lookup)
            .resolve("British_Empire")
            .await
            .unwrap();
        assert_eq!(name, "British Empire");
    }

    #[tokio::test]
    async fn test_redirect_chain_reaches_final_target() {
        let lookup = MapLookup::new(&[
            ("UK", redirect("United Kingdom of Great Britain")),
            ("United Kingdom of Great Britain", redirect("United Kingdom")),
            ("United Kingdom", PageKind::Article),
        ]);
        let name = NameResolver::new(&lookup).resolve("UK").await.unwrap();
        assert_eq!(name, "United Kingdom");
    }

    #[tokio::test]
    async fn test_redirect_cycle_fails_not_found() {
        let lookup = MapLookup::new(&[("Ping", redirect("Pong")), ("Pong", redirect("Ping"))]);
        let err = NameResolver::new(&lookup).resolve("Ping").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_capitalization_variant_resolves() {
        let lookup = MapLookup::new(&[("Bat", PageKind::Article)]);
        let resolver = NameResolver::new(&lookup);
        let from_variant = resolver.resolve("bAT").await.unwrap();
        let direct = resolver.resolve("Bat").await.unwrap();
        assert_eq!(from_variant, direct);
    }

    #[tokio::test]
    async fn test_redirect_target_with_wrong_case_uses_variants() {
        let lookup = MapLookup::new(&[
            ("Programming languages", redirect("programming language")),
            ("Programming language", PageKind::Article),
        ]);
        let name = NameResolver::new(&lookup)
            .resolve("Programming_languages")
            .await
            .unwrap();
        assert_eq!(name, "Programming language");
    }

    #[tokio::test]
    async fn test_variants_do_not_cascade() {
        let lookup = MapLookup::new(&[]);
        let err = NameResolver::new(&lookup)
            .resolve("no Such page")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        // original title plus at most five variant lookups
        assert!(lookup.calls.load(Ordering::SeqCst) <= 6);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let lookup = MapLookup::new(&[
            ("Bat (animal)", redirect("Bat")),
            ("Bat", PageKind::Article),
        ]);
        let resolver = NameResolver::new(&lookup);
        for raw in ["bat (animal)", "Bat_(animal)", "BAT", "Bat"] {
            let once = resolver.resolve(raw).await.unwrap();
            let twice = resolver.resolve(&once).await.unwrap();
            assert_eq!(once, twice, "resolution of {} is not idempotent", raw);
        }
    }

    #[tokio::test]
    async fn test_backend_errors_propagate() {
        struct Broken;

        #[async_trait]
        impl TitleLookup for Broken {
            async fn lookup(&self, _title: &str) -> Result<PageKind> {
                Err(WikiracerError::Fetch("backend down".to_string()))
            }
        }

        let err = NameResolver::new(&Broken).resolve("Bat").await.unwrap_err();
        assert!(matches!(err, WikiracerError::Fetch(_)));
    }

    #[test]
    fn test_blacklist_extension_is_persistent() {
        let base = Blacklist::default().extended("A");
        let left = base.extended("B");
        let right = base.extended("C");
        assert!(left.contains("B") && !left.contains("C"));
        assert!(right.contains("C") && !right.contains("B"));
        assert!(base.contains("A") && !base.contains("B") && !base.contains("C"));
    }
}
