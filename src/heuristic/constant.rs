use async_trait::async_trait;
use std::sync::Arc;

use super::Heuristic;
use crate::error::Result;
use crate::provider::ContentProvider;
use crate::title::same_title;

/// Same score for every node, optionally with a goal shortcut.
///
/// Under A* a positive constant turns the search into breadth-first order,
/// a negative one into depth-first order. With the shortcut enabled the goal
/// scores negative infinity, so it is taken as soon as it is discovered.
pub struct ConstantHeuristic {
    name: &'static str,
    value: f64,
    shortcut: bool,
    goal: Option<String>,
}

impl ConstantHeuristic {
    pub fn new(name: &'static str, value: f64, shortcut: bool) -> Self {
        Self {
            name,
            value,
            shortcut,
            goal: None,
        }
    }

    pub fn null() -> Self {
        Self::new("null", 0.0, false)
    }

    pub fn bfs() -> Self {
        Self::new("bfs", 1.0, false)
    }

    pub fn dfs() -> Self {
        Self::new("dfs", -1.0, false)
    }

    pub fn shortcut_bfs() -> Self {
        Self::new("shortcut-bfs", 1.0, true)
    }

    pub fn shortcut_dfs() -> Self {
        Self::new("shortcut-dfs", -1.0, true)
    }
}

#[async_trait]
impl Heuristic for ConstantHeuristic {
    fn name(&self) -> &str {
        self.name
    }

    async fn setup(
        &mut self,
        _provider: Arc<dyn ContentProvider>,
        _start: &str,
        goal: &str,
    ) -> Result<()> {
        self.goal = Some(goal.to_string());
        Ok(())
    }

    fn calculate(&self, node: &str) -> f64 {
        match &self.goal {
            Some(goal) if self.shortcut && same_title(node, goal) => f64::NEG_INFINITY,
            _ => self.value,
        }
    }
}
