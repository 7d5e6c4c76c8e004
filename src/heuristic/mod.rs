//! Heuristic providers: per-search scorers for frontier priorities.
//!
//! Lower scores are closer to the goal. Two values are reserved:
//! `f64::NEG_INFINITY` forces the node to be popped next, and
//! `f64::INFINITY` marks a node as unscored without removing it.

pub mod constant;
pub mod registry;
pub mod tfidf;

pub use constant::ConstantHeuristic;
pub use registry::{HeuristicContext, HeuristicKind};
pub use tfidf::{TfIdfHeuristic, TfIdfModel};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::provider::{ContentProvider, Links};

/// Stateful scorer owned by exactly one search.
///
/// Lifecycle: `setup` once, then per expansion one `preprocess_neighbors`
/// call followed by `calculate` for each unvisited neighbor.
#[async_trait]
pub trait Heuristic: Send + Sync {
    /// Registry name, used in logs and benchmark reports.
    fn name(&self) -> &str;

    /// One-time work for a start/goal pair. Errors abort the search.
    async fn setup(
        &mut self,
        _provider: Arc<dyn ContentProvider>,
        _start: &str,
        _goal: &str,
    ) -> Result<()> {
        Ok(())
    }

    /// Bulk step over the full neighbor set of the node just expanded.
    async fn preprocess_neighbors(&mut self, _neighbors: &Links) {}

    /// Score a single node.
    fn calculate(&self, node: &str) -> f64;
}
