//! Best-first search over the article graph.

pub mod frontier;
pub mod path;

pub use frontier::Frontier;
pub use path::SearchPath;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::heuristic::Heuristic;
use crate::provider::ContentProvider;
use crate::title::abbreviate_path;

/// How frontier priorities are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Accumulated heuristic cost along the path plus the new score
    #[default]
    AStar,
    /// The new score alone
    Greedy,
}

impl SearchMode {
    pub fn from_greedy(greedy: bool) -> Self {
        if greedy {
            SearchMode::Greedy
        } else {
            SearchMode::AStar
        }
    }

    pub fn is_greedy(&self) -> bool {
        matches!(self, SearchMode::Greedy)
    }

    fn priority(&self, parent: f64, score: f64) -> f64 {
        match self {
            SearchMode::AStar => parent + score,
            SearchMode::Greedy => score,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::AStar => f.write_str("astar"),
            SearchMode::Greedy => f.write_str("greedy"),
        }
    }
}

/// Result of one search. An empty path means the goal was unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Vec<String>,
    pub nodes_expanded: usize,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn path_length(&self) -> usize {
        self.path.len()
    }
}

/// Drives a single best-first traversal.
///
/// The loop is sequential; all per-search state (frontier, visited set,
/// heuristic) is owned by one `run` call. A provider documented as safe to
/// share may back several engines running concurrently.
pub struct SearchEngine {
    provider: Arc<dyn ContentProvider>,
}

impl SearchEngine {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn ContentProvider> {
        &self.provider
    }

    /// Search from `start` to `goal`. Both should already be canonical.
    ///
    /// Only heuristic setup errors are returned; a node whose content cannot
    /// be fetched is logged and treated as a dead end. The loop yields to
    /// the runtime after every expansion, so wrapping the call in
    /// `tokio::time::timeout` bounds it.
    pub async fn run(
        &self,
        start: &str,
        goal: &str,
        heuristic: &mut dyn Heuristic,
        mode: SearchMode,
    ) -> Result<SearchOutcome> {
        heuristic.setup(Arc::clone(&self.provider), start, goal).await?;

        let mut frontier = Frontier::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut nodes_expanded = 0;
        frontier.push(0.0, SearchPath::start(start));

        while let Some((priority, path)) = frontier.pop() {
            let node = path.title();
            if !visited.insert(node.to_string()) {
                continue;
            }

            if self.provider.is_same_node(node, goal).await {
                log::info!(
                    "Reached {} after {} expansions ({} heuristic, {})",
                    goal,
                    nodes_expanded,
                    heuristic.name(),
                    mode
                );
                return Ok(SearchOutcome {
                    path: path.to_vec(),
                    nodes_expanded,
                });
            }

            if !self.provider.is_valid_article(node).await {
                log::debug!("Skipping {}: not a valid article", node);
                continue;
            }

            let neighbors = match self.provider.text_and_links(node).await {
                Ok((_, neighbors)) => neighbors,
                Err(e) => {
                    log::warn!("Skipping {}: {}", node, e);
                    continue;
                }
            };
            nodes_expanded += 1;

            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "Got {} neighbors for {} at depth {}: {}",
                    neighbors.len(),
                    node,
                    path.depth(),
                    abbreviate_path(&path.to_vec())
                );
            }

            heuristic.preprocess_neighbors(&neighbors).await;
            for neighbor in &neighbors {
                if visited.contains(neighbor) {
                    continue;
                }
                let score = heuristic.calculate(neighbor);
                frontier.push(mode.priority(priority, score), path.extend(neighbor));
            }

            tokio::task::yield_now().await;
        }

        log::warn!("No path found between {} and {}!", start, goal);
        Ok(SearchOutcome {
            path: Vec::new(),
            nodes_expanded,
        })
    }
}
