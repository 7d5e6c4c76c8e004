use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use super::path::SearchPath;

/// Frontier entry. Lower priority pops first; equal priorities pop in
/// insertion order.
struct Entry {
    priority: f64,
    seq: u64,
    path: Arc<SearchPath>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of search paths with lazy deletion: stale entries for
/// already-visited nodes stay queued and are skipped by the caller on pop.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: f64, path: Arc<SearchPath>) {
        let priority = if priority.is_nan() {
            log::warn!(
                "NaN priority for {}, treating it as unreachable",
                path.title()
            );
            f64::INFINITY
        } else if priority == 0.0 {
            // -0.0 sorts before 0.0 under total_cmp
            0.0
        } else {
            priority
        };

        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            path,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<(f64, Arc<SearchPath>)> {
        self.heap.pop().map(|entry| (entry.priority, entry.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(frontier: &mut Frontier) -> Vec<String> {
        std::iter::from_fn(|| frontier.pop())
            .map(|(_, path)| path.title().to_string())
            .collect()
    }

    #[test]
    fn test_lowest_priority_first() {
        let mut frontier = Frontier::new();
        frontier.push(3.0, SearchPath::start("C"));
        frontier.push(1.0, SearchPath::start("A"));
        frontier.push(2.0, SearchPath::start("B"));
        assert_eq!(titles(&mut frontier), vec!["A", "B", "C"]);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut frontier = Frontier::new();
        for title in ["first", "second", "third"] {
            frontier.push(1.0, SearchPath::start(title));
        }
        frontier.push(0.5, SearchPath::start("best"));
        assert_eq!(titles(&mut frontier), vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn test_infinities_and_nan() {
        let mut frontier = Frontier::new();
        frontier.push(f64::INFINITY, SearchPath::start("unscored"));
        frontier.push(f64::NAN, SearchPath::start("nan"));
        frontier.push(-1e9, SearchPath::start("deep"));
        frontier.push(f64::NEG_INFINITY, SearchPath::start("goal"));
        frontier.push(-0.0, SearchPath::start("negzero"));
        frontier.push(0.0, SearchPath::start("zero"));

        assert_eq!(
            titles(&mut frontier),
            vec!["goal", "deep", "negzero", "zero", "unscored", "nan"]
        );
    }
}
