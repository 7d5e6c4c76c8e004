use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{ConstantHeuristic, Heuristic, TfIdfHeuristic, TfIdfModel};
use crate::config::TfIdfConfig;
use crate::error::{Result, WikiracerError};

/// Every heuristic the tools can run, by registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    /// 0 for every node
    Null,
    /// 1 per edge: breadth-first under A*
    Bfs,
    /// -1 per edge: depth-first under A*
    Dfs,
    /// Like bfs, but the goal is taken as soon as it is seen
    ShortcutBfs,
    /// Like dfs, but the goal is taken as soon as it is seen
    ShortcutDfs,
    /// TF-IDF distance between summaries and the goal's keywords
    #[serde(rename = "tfidf")]
    #[value(name = "tfidf")]
    TfIdf,
}

impl HeuristicKind {
    pub fn all() -> &'static [HeuristicKind] {
        &[
            HeuristicKind::Null,
            HeuristicKind::Bfs,
            HeuristicKind::Dfs,
            HeuristicKind::ShortcutBfs,
            HeuristicKind::ShortcutDfs,
            HeuristicKind::TfIdf,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::Null => "null",
            HeuristicKind::Bfs => "bfs",
            HeuristicKind::Dfs => "dfs",
            HeuristicKind::ShortcutBfs => "shortcut-bfs",
            HeuristicKind::ShortcutDfs => "shortcut-dfs",
            HeuristicKind::TfIdf => "tfidf",
        }
    }

    /// Whether building this heuristic needs a fitted TF-IDF model.
    pub fn needs_model(&self) -> bool {
        matches!(self, HeuristicKind::TfIdf)
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HeuristicKind {
    type Err = WikiracerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        HeuristicKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = HeuristicKind::all().iter().map(|k| k.name()).collect();
                WikiracerError::InvalidInput(format!(
                    "unknown heuristic '{}' (expected one of: {})",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Shared, read-only state heuristics are built from. Owned by the caller
/// for the lifetime of a run so the TF-IDF model is fitted once.
#[derive(Clone, Default)]
pub struct HeuristicContext {
    tfidf: Option<Arc<TfIdfModel>>,
    keyword_limit: usize,
}

impl HeuristicContext {
    /// Load whatever the requested heuristics need, before any search runs.
    pub fn prepare(kinds: &[HeuristicKind], config: &TfIdfConfig) -> Result<Self> {
        let tfidf = if kinds.iter().any(HeuristicKind::needs_model) {
            let path = config.corpus_path.as_ref().ok_or_else(|| {
                WikiracerError::Config(
                    "tfidf heuristic needs tfidf.corpus_path (or --corpus)".to_string(),
                )
            })?;
            Some(Arc::new(TfIdfModel::from_corpus_file(path)?))
        } else {
            None
        };

        Ok(Self {
            tfidf,
            keyword_limit: config.keyword_limit,
        })
    }

    pub fn with_model(model: Arc<TfIdfModel>, keyword_limit: usize) -> Self {
        Self {
            tfidf: Some(model),
            keyword_limit,
        }
    }

    /// A fresh heuristic instance for one search.
    pub fn build(&self, kind: HeuristicKind) -> Result<Box<dyn Heuristic>> {
        let heuristic: Box<dyn Heuristic> = match kind {
            HeuristicKind::Null => Box::new(ConstantHeuristic::null()),
            HeuristicKind::Bfs => Box::new(ConstantHeuristic::bfs()),
            HeuristicKind::Dfs => Box::new(ConstantHeuristic::dfs()),
            HeuristicKind::ShortcutBfs => Box::new(ConstantHeuristic::shortcut_bfs()),
            HeuristicKind::ShortcutDfs => Box::new(ConstantHeuristic::shortcut_dfs()),
            HeuristicKind::TfIdf => {
                let model = self.tfidf.clone().ok_or_else(|| {
                    WikiracerError::Config("no TF-IDF model was prepared".to_string())
                })?;
                Box::new(TfIdfHeuristic::new(model, self.keyword_limit))
            }
        };
        Ok(heuristic)
    }
}
