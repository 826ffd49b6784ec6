use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Restricts reported additions and changes to the requested paths
///
/// A file passes when it is one of the requested paths or lies beneath one of
/// them. With no requested paths every file passes.
#[derive(Debug, Clone)]
pub struct PathFilter {
    path_trie: Trie<String>,
}

impl PathFilter {
    pub fn empty() -> Self {
        Self {
            path_trie: Trie::with_matching(true),
        }
    }

    pub fn new(paths: Vec<PathBuf>) -> Self {
        if paths.is_empty() {
            return Self::empty();
        }

        let mut trie = Trie::new();
        for path in paths {
            trie.insert(&Self::components(&path));
        }

        Self { path_trie: trie }
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.path_trie.contains_prefix_of(&Self::components(path))
    }

    fn components(path: &Path) -> Vec<String> {
        path.components()
            .filter(|component| matches!(component, std::path::Component::Normal(_)))
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie<T: Hash + Eq + Clone> {
    is_matching: bool,
    children: HashMap<T, Trie<T>>,
}

impl<T: Hash + Eq + Clone> Trie<T> {
    pub fn new() -> Self {
        Trie {
            is_matching: false,
            children: HashMap::new(),
        }
    }

    pub fn with_matching(is_matching: bool) -> Self {
        Trie {
            is_matching,
            children: HashMap::new(),
        }
    }

    pub fn insert(&mut self, path: &[T]) {
        let mut node = self;
        for part in path {
            node = node.children.entry(part.clone()).or_insert_with(Trie::new);
        }
        node.is_matching = true;
    }

    #[cfg(test)]
    pub fn contains(&self, path: &[T]) -> bool {
        let mut node = self;
        for part in path {
            match node.children.get(part) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_matching
    }

    /// Whether some inserted path equals `path` or is one of its ancestors
    pub fn contains_prefix_of(&self, path: &[T]) -> bool {
        let mut node = self;
        for part in path {
            if node.is_matching {
                return true;
            }
            match node.children.get(part) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_matching
    }
}

impl<T: Hash + Eq + Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}
