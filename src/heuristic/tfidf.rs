//! TF-IDF similarity to the goal article's summary.
//!
//! The model is fitted once from a corpus file (one document per line) and
//! shared read-only by every search through an `Arc`.

use async_trait::async_trait;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use stop_words::{get, LANGUAGE};

use super::Heuristic;
use crate::error::{Result, WikiracerError};
use crate::provider::{ContentProvider, Links};
use crate::title::same_title;

/// Term → weight of one document, L2-normalized.
pub type TermWeights = HashMap<String, f64>;

fn stopwords() -> &'static HashSet<String> {
    static CELL: OnceLock<HashSet<String>> = OnceLock::new();
    CELL.get_or_init(|| get(LANGUAGE::English).iter().map(|s| s.to_string()).collect())
}

fn stemmer() -> &'static Stemmer {
    static CELL: OnceLock<Stemmer> = OnceLock::new();
    CELL.get_or_init(|| Stemmer::create(Algorithm::English))
}

fn token_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex pattern"))
}

/// Lowercase, drop ASCII punctuation, keep words of two or more characters
/// that are not English stop words, and reduce each to its Porter stem.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let stopwords = stopwords();
    let stemmer = stemmer();
    token_regex()
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|t| !stopwords.contains(*t))
        .map(|t| stemmer.stem(t).into_owned())
        .collect()
}

/// Fitted vocabulary with smoothed inverse document frequencies
/// (`ln((1 + n) / (1 + df)) + 1`).
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    idf: HashMap<String, f64>,
    documents: usize,
}

impl TfIdfModel {
    pub fn fit<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut n = 0usize;
        for doc in documents {
            n += 1;
            let terms: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in terms {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        if n == 0 {
            return Err(WikiracerError::InvalidInput("TF-IDF corpus is empty".to_string()));
        }
        if df.is_empty() {
            return Err(WikiracerError::InvalidInput(
                "TF-IDF corpus has no usable terms".to_string(),
            ));
        }

        let idf = df
            .into_iter()
            .map(|(term, count)| {
                let weight = ((1 + n) as f64 / (1 + count) as f64).ln() + 1.0;
                (term, weight)
            })
            .collect();
        Ok(Self { idf, documents: n })
    }

    /// Fit from a corpus file, one document per non-blank line.
    pub fn from_corpus_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let model = Self::fit(content.lines().filter(|l| !l.trim().is_empty()))?;
        log::info!(
            "Fitted TF-IDF model from {}: {} documents, {} terms",
            path.display(),
            model.document_count(),
            model.vocabulary_len()
        );
        Ok(model)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Weights of the known terms of `text`. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> TermWeights {
        let mut weights = TermWeights::new();
        for token in tokenize(text) {
            if let Some(idf) = self.idf.get(&token) {
                *weights.entry(token).or_insert(0.0) += idf;
            }
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    }

    /// Heaviest `limit` terms, heaviest first; ties in term order.
    pub fn top_terms(weights: &TermWeights, limit: usize) -> Vec<(String, f64)> {
        let mut terms: Vec<(String, f64)> =
            weights.iter().map(|(t, w)| (t.clone(), *w)).collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(limit);
        terms
    }

    /// Distance from a node to the goal's top terms: the `i`-th term adds
    /// `|goal - node| / (i + 1)` when the node has it, else the full goal
    /// weight.
    pub fn compare(node: &TermWeights, goal_terms: &[(String, f64)]) -> f64 {
        goal_terms
            .iter()
            .enumerate()
            .map(|(i, (term, goal_weight))| match node.get(term) {
                Some(node_weight) => (goal_weight - node_weight).abs() / (i + 1) as f64,
                None => *goal_weight,
            })
            .sum()
    }
}

/// Scores nodes by how far their summary's TF-IDF profile is from the
/// goal's top keywords. The goal scores 0; nodes without a summary score
/// positive infinity.
pub struct TfIdfHeuristic {
    model: Arc<TfIdfModel>,
    keyword_limit: usize,
    provider: Option<Arc<dyn ContentProvider>>,
    goal: Option<String>,
    goal_terms: Vec<(String, f64)>,
    summaries: HashMap<String, String>,
}

impl TfIdfHeuristic {
    pub fn new(model: Arc<TfIdfModel>, keyword_limit: usize) -> Self {
        Self {
            model,
            keyword_limit,
            provider: None,
            goal: None,
            goal_terms: Vec::new(),
            summaries: HashMap::new(),
        }
    }
}

#[async_trait]
impl Heuristic for TfIdfHeuristic {
    fn name(&self) -> &str {
        "tfidf"
    }

    async fn setup(
        &mut self,
        provider: Arc<dyn ContentProvider>,
        _start: &str,
        goal: &str,
    ) -> Result<()> {
        let request: Links = std::iter::once(goal.to_string()).collect();
        let summary = provider
            .summaries(&request)
            .await
            .remove(goal)
            .ok_or_else(|| WikiracerError::Setup(format!("no summary for goal {}", goal)))?;

        let weights = self.model.transform(&summary);
        // the goal's own top term counts too, hence the + 1
        let goal_terms = TfIdfModel::top_terms(&weights, self.keyword_limit + 1);
        if goal_terms.is_empty() {
            return Err(WikiracerError::Setup(format!(
                "summary of {} has no known terms",
                goal
            )));
        }

        log::info!(
            "Top {} keywords for goal article {}: {:?}",
            self.keyword_limit,
            goal,
            goal_terms
        );
        self.goal_terms = goal_terms;
        self.goal = Some(goal.to_string());
        self.summaries.clear();
        self.summaries.insert(goal.to_string(), summary);
        self.provider = Some(provider);
        Ok(())
    }

    async fn preprocess_neighbors(&mut self, neighbors: &Links) {
        let Some(provider) = &self.provider else {
            return;
        };
        let missing: Links = neighbors
            .iter()
            .filter(|t| !self.summaries.contains_key(*t))
            .cloned()
            .collect();
        if missing.is_empty() {
            return;
        }
        let fetched = provider.summaries(&missing).await;
        log::debug!("Got {}/{} neighbor summaries", fetched.len(), missing.len());
        self.summaries.extend(fetched);
    }

    fn calculate(&self, node: &str) -> f64 {
        if self.goal.as_deref().is_some_and(|goal| same_title(node, goal)) {
            return 0.0;
        }
        match self.summaries.get(node) {
            Some(summary) => TfIdfModel::compare(&self.model.transform(summary), &self.goal_terms),
            None => f64::INFINITY,
        }
    }
}
