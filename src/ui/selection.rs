//! ui::selection
//!
//! Ordered multi-select over working-tree paths for partial staging.

/// Selected paths in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    paths: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `path` if unselected, otherwise deselect it.
    /// Returns whether the path is now selected.
    pub fn toggle(&mut self, path: &str) -> bool {
        match self.paths.iter().position(|p| p == path) {
            Some(idx) => {
                self.paths.remove(idx);
                false
            }
            None => {
                self.paths.push(path.to_string());
                true
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Drop selections that are no longer stageable (after a refresh).
    pub fn retain_available<'a>(&mut self, available: impl IntoIterator<Item = &'a str>) {
        let available: Vec<&str> = available.into_iter().collect();
        self.paths.retain(|p| available.contains(&p.as_str()));
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Take the selection for a stage request, leaving the set empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_preserves_pick_order() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("b.txt"));
        assert!(set.toggle("a.txt"));
        assert!(!set.toggle("b.txt"));
        assert!(set.toggle("b.txt"));
        assert_eq!(set.paths(), ["a.txt", "b.txt"]);
    }

    #[test]
    fn retain_available_drops_stale_paths() {
        let mut set = SelectionSet::new();
        set.toggle("gone.txt");
        set.toggle("kept.txt");
        set.retain_available(["kept.txt", "other.txt"]);
        assert_eq!(set.paths(), ["kept.txt"]);
    }

    #[test]
    fn take_empties_the_set() {
        let mut set = SelectionSet::new();
        set.toggle("a");
        assert_eq!(set.take(), ["a"]);
        assert!(set.is_empty());
    }
}
