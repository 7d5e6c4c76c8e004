use std::sync::Arc;

/// Persistent path from the start node: each step shares its prefix with
/// every other path branching off the same parent, so pushing a neighbor
/// onto the frontier costs one allocation instead of a full copy.
#[derive(Debug)]
pub struct SearchPath {
    title: String,
    parent: Option<Arc<SearchPath>>,
    len: usize,
}

impl SearchPath {
    pub fn start(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            parent: None,
            len: 1,
        })
    }

    /// This path followed by `title`.
    pub fn extend(self: &Arc<Self>, title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            parent: Some(Arc::clone(self)),
            len: self.len + 1,
        })
    }

    /// Last node of the path.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of nodes, start included.
    pub fn depth(&self) -> usize {
        self.len
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut titles = Vec::with_capacity(self.len);
        let mut node = Some(self);
        while let Some(step) = node {
            titles.push(step.title.clone());
            node = step.parent.as_deref();
        }
        titles.reverse();
        titles
    }
}

// Unlink iteratively; the default recursive drop overflows the stack on
// very long depth-first paths.
impl Drop for SearchPath {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Arc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_shares_prefix() {
        let a = SearchPath::start("A");
        let ab = a.extend("B");
        let ac = a.extend("C");
        let abd = ab.extend("D");

        assert_eq!(abd.to_vec(), vec!["A", "B", "D"]);
        assert_eq!(ac.to_vec(), vec!["A", "C"]);
        assert_eq!(abd.depth(), 3);
        assert_eq!(abd.title(), "D");
        assert_eq!(a.to_vec(), vec!["A"]);
    }

    #[test]
    fn test_long_path_drops() {
        let mut path = SearchPath::start("N0");
        for i in 1..200_000 {
            path = path.extend(&format!("N{}", i));
        }
        assert_eq!(path.depth(), 200_000);
        drop(path);
    }

    #[test]
    fn test_dropping_branch_keeps_shared_prefix() {
        let a = SearchPath::start("A");
        let ab = a.extend("B");
        {
            let _abc = ab.extend("C");
        }
        assert_eq!(ab.to_vec(), vec!["A", "B"]);
    }
}
