//! MediaWiki-style article store on SQLite.
//!
//! Titles are stored the MediaWiki way (`Fruit_bat`) and handed out in
//! canonical space-separated form.

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use super::{canonical_links, ContentProvider, Links};
use crate::db::{migrate, Db};
use crate::error::{Result, WikiracerError};
use crate::resolve::{NameResolver, PageKind, TitleLookup};
use crate::title::normalize;
use crate::wikitext;

const WIKITEXT_QUERY: &str = "SELECT t.old_text
     FROM page p
     JOIN revision r ON r.rev_id = p.page_latest
     JOIN text t ON t.old_id = r.rev_text_id
     WHERE p.page_namespace = 0 AND p.page_title = ?1";

fn db_title(title: &str) -> String {
    title.trim().replace(' ', "_")
}

/// Latest wikitext of a namespace-0 page, if any.
fn latest_wikitext(conn: &Connection, title: &str) -> Result<Option<String>> {
    let text = conn
        .query_row(WIKITEXT_QUERY, params![db_title(title)], |row| {
            Ok(match row.get_ref(0)? {
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    String::from_utf8_lossy(bytes).into_owned()
                }
                _ => String::new(),
            })
        })
        .optional()?;
    Ok(text)
}

/// Article provider backed by a MediaWiki `page`/`revision`/`text` schema.
/// Safe to share across concurrent searches.
pub struct SqlProvider {
    db: Db,
}

impl SqlProvider {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db: Db::new(db_path),
        }
    }

    async fn page_text(&self, title: &str) -> Result<Option<String>> {
        let title = title.to_string();
        self.db
            .with_connection(move |conn| latest_wikitext(conn, &title))
            .await
    }

    /// Wikitext of the article `title` canonicalizes to.
    async fn article_text(&self, title: &str) -> Result<String> {
        let canonical = self.canonical_name(title).await?;
        self.page_text(&canonical)
            .await?
            .ok_or(WikiracerError::NotFound(canonical))
    }

    /// Insert or replace a page with a new latest revision.
    pub async fn insert_page(&self, title: &str, text: &str) -> Result<()> {
        let title = db_title(title);
        let text = text.to_string();
        self.db
            .with_connection(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("INSERT INTO text (old_text) VALUES (?1)", params![text])?;
                let text_id = tx.last_insert_rowid();

                tx.execute(
                    "INSERT INTO page (page_namespace, page_title, page_is_redirect)
                     VALUES (0, ?1, ?2)
                     ON CONFLICT(page_namespace, page_title)
                     DO UPDATE SET page_is_redirect = excluded.page_is_redirect",
                    params![title, wikitext::is_redirect(&text)],
                )?;
                let page_id: i64 = tx.query_row(
                    "SELECT page_id FROM page WHERE page_namespace = 0 AND page_title = ?1",
                    params![title],
                    |row| row.get(0),
                )?;

                tx.execute(
                    "INSERT INTO revision (rev_page, rev_text_id) VALUES (?1, ?2)",
                    params![page_id, text_id],
                )?;
                let rev_id = tx.last_insert_rowid();
                tx.execute(
                    "UPDATE page SET page_latest = ?1 WHERE page_id = ?2",
                    params![rev_id, page_id],
                )?;

                tx.commit()?;
                Ok(())
            })
            .await
    }

    /// Number of namespace-0 pages, redirects included.
    pub async fn page_count(&self) -> Result<i64> {
        self.db
            .with_connection(|conn| {
                let count =
                    conn.query_row("SELECT COUNT(*) FROM page WHERE page_namespace = 0", [], |row| {
                        row.get(0)
                    })?;
                Ok(count)
            })
            .await
    }
}

#[async_trait]
impl TitleLookup for SqlProvider {
    async fn lookup(&self, title: &str) -> Result<PageKind> {
        let text = match self.page_text(title).await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Ok(PageKind::Missing),
        };

        if !wikitext::is_redirect(&text) {
            return Ok(PageKind::Article);
        }
        match wikitext::redirect_target(&text) {
            Some(target) => Ok(PageKind::Redirect(target)),
            None => Err(WikiracerError::NotFound(format!(
                "{} (redirect without target)",
                title
            ))),
        }
    }
}

#[async_trait]
impl ContentProvider for SqlProvider {
    async fn load(&self) -> Result<()> {
        self.db
            .with_connection(|conn| migrate::run_migrations(conn))
            .await?;
        let pages = self.page_count().await?;
        log::info!(
            "SQLite store {} ready: {} pages",
            self.db.path().display(),
            pages
        );
        Ok(())
    }

    async fn canonical_name(&self, title: &str) -> Result<String> {
        NameResolver::new(self).resolve(title).await
    }

    async fn text_and_links(&self, title: &str) -> Result<(String, Links)> {
        let text = self.article_text(title).await?;
        let links = canonical_links(self, wikitext::link_targets(&text)).await?;
        Ok((wikitext::strip_code(&text), links))
    }

    async fn summaries(&self, titles: &Links) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for title in titles {
            match self.article_text(title).await {
                Ok(text) => {
                    out.insert(title.clone(), wikitext::strip_code(&text));
                }
                Err(e) if e.is_not_found() => log::debug!("No summary for {}: {}", title, e),
                Err(e) => log::warn!("Summary fetch failed for {}: {}", title, e),
            }
        }
        out
    }

    async fn random_title(&self) -> Result<String> {
        let title: Option<String> = self
            .db
            .with_connection(|conn| {
                let title = conn
                    .query_row(
                        "SELECT page_title FROM page
                         WHERE page_namespace = 0 AND page_is_redirect = 0
                         ORDER BY RANDOM() LIMIT 1",
                        [],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(title)
            })
            .await?;
        title
            .map(|t| normalize(&t))
            .ok_or_else(|| WikiracerError::NotFound("store has no articles".to_string()))
    }
}
