use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use super::{html, ContentProvider, Links};
use crate::cache::SummaryCache;
use crate::config::RestConfig;
use crate::error::{Result, WikiracerError};
use crate::title::normalize;

/// Response structure of `page/summary/{title}`
#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: Option<String>,
}

/// Response structure of `page/random/title`
#[derive(Deserialize)]
struct RandomResponse {
    items: Vec<RandomItem>,
}

#[derive(Deserialize)]
struct RandomItem {
    title: String,
}

/// Live Wikipedia REST v1 client
///
/// Page HTML drives canonical names, text and links; summaries come from the
/// summary endpoint through a bounded pool of concurrent requests and a
/// shared LRU cache. Safe to share across concurrent searches.
pub struct RestProvider {
    client: Client,
    api_root: Url,
    worker_count: usize,
    cache: Arc<SummaryCache>,
}

impl RestProvider {
    pub fn new(config: &RestConfig, cache: Arc<SummaryCache>) -> Result<Self> {
        let api_root = Url::parse(&config.api_root).map_err(|e| {
            WikiracerError::Config(format!("invalid api_root {}: {}", config.api_root, e))
        })?;
        if api_root.cannot_be_a_base() {
            return Err(WikiracerError::Config(format!(
                "api_root cannot be a base URL: {}",
                config.api_root
            )));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_root,
            worker_count: config.worker_count.max(1),
            cache,
        })
    }

    /// `{api_root}/page/{kind}/{Title_with_underscores}`, title percent-encoded.
    fn endpoint(&self, kind: &str, title: Option<&str>) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("page").push(kind);
            if let Some(title) = title {
                segments.push(&title.trim().replace(' ', "_"));
            }
        }
        url
    }

    async fn get_html(&self, title: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(self.endpoint("html", Some(title)))
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(WikiracerError::NotFound(title.to_string())),
            status => Err(WikiracerError::Fetch(format!(
                "page/html/{} returned {}",
                title, status
            ))),
        }
    }

    async fn fetch_summary(&self, title: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.endpoint("summary", Some(title)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WikiracerError::Fetch(format!(
                "page/summary/{} returned {}",
                title,
                response.status()
            )));
        }
        let summary: SummaryResponse = response.json().await?;
        Ok(summary.extract.filter(|s| !s.trim().is_empty()))
    }
}

/// Canonical title from the final (post-redirect) page URL.
fn title_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let title = normalize(&html::percent_decode(segment));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[async_trait]
impl ContentProvider for RestProvider {
    async fn canonical_name(&self, title: &str) -> Result<String> {
        if title.trim().is_empty() {
            return Err(WikiracerError::NotFound(title.to_string()));
        }
        let response = match self.get_html(title).await {
            Ok(response) => response,
            Err(WikiracerError::Fetch(_)) => {
                return Err(WikiracerError::NotFound(title.to_string()))
            }
            Err(e) => return Err(e),
        };
        title_from_url(response.url()).ok_or_else(|| WikiracerError::NotFound(title.to_string()))
    }

    async fn text_and_links(&self, title: &str) -> Result<(String, Links)> {
        let body = self.get_html(title).await?.text().await?;
        Ok((html::extract_text(&body), html::extract_links(&body)))
    }

    async fn summaries(&self, titles: &Links) -> HashMap<String, String> {
        let mut out = HashMap::with_capacity(titles.len());
        let mut pending = Vec::new();
        for title in titles {
            match self.cache.get(title) {
                Some(summary) => {
                    out.insert(title.clone(), summary);
                }
                None => pending.push(title.clone()),
            }
        }
        if pending.is_empty() {
            return out;
        }

        let started = Instant::now();
        let requested = pending.len();
        let fetched: Vec<(String, Result<Option<String>>)> = stream::iter(pending)
            .map(|title| async move {
                let summary = self.fetch_summary(&title).await;
                (title, summary)
            })
            .buffer_unordered(self.worker_count)
            .collect()
            .await;

        for (title, summary) in fetched {
            match summary {
                Ok(Some(summary)) => {
                    self.cache.put(title.clone(), summary.clone());
                    out.insert(title, summary);
                }
                Ok(None) => log::debug!("Empty summary for {}", title),
                Err(e) => log::warn!("Summary fetch failed for {}: {}", title, e),
            }
        }

        log::debug!(
            "Fetched {} summaries ({} requested, {} cached) in {:.2}s, {} resident",
            out.len(),
            requested,
            titles.len() - requested,
            started.elapsed().as_secs_f64(),
            self.cache.resident()
        );
        out
    }

    async fn is_same_node(&self, a: &str, b: &str) -> bool {
        normalize(a).trim() == normalize(b).trim()
    }

    async fn random_title(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint("random", Some("title")))
            .send()
            .await?
            .error_for_status()?;
        let random: RandomResponse = response.json().await?;
        random
            .items
            .into_iter()
            .next()
            .map(|item| normalize(&item.title))
            .ok_or_else(|| WikiracerError::Parse("page/random/title returned no items".into()))
    }
}
