use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe topic trie with MQTT-style wildcards.
///
/// - `+` matches exactly one level
/// - `#` matches zero or more remaining levels (last segment only)
///
/// Levels are separated by `/`. Used for state subscriptions
/// (`post/+`), request routing (`posts/#`) and query-cache observers
/// (`posts/list`).
pub struct Trie<T> {
    root: RwLock<Node<T>>,
}

struct Node<T> {
    children: HashMap<String, Node<T>>,
    /// `+` child.
    single: Option<Box<Node<T>>>,
    /// Values registered with a trailing `#` at this level.
    rest: Vec<T>,
    /// Values whose pattern ends exactly here.
    values: Vec<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            single: None,
            rest: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Node<T>> {
        self.root.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Node<T>> {
        self.root.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `value` under `pattern`.
    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.write();
        let mut node = &mut *root;
        for segment in levels(pattern) {
            match segment {
                "#" => {
                    node.rest.push(value);
                    return;
                }
                "+" => {
                    node = node.single.get_or_insert_with(Box::default);
                }
                exact => {
                    node = node.children.entry(exact.to_string()).or_default();
                }
            }
        }
        node.values.push(value);
    }

    /// All values whose pattern matches the concrete `topic`.
    pub fn match_topic(&self, topic: &str) -> Vec<T> {
        let root = self.read();
        let segments: Vec<&str> = levels(topic).collect();
        let mut out = Vec::new();
        collect(&root, &segments, &mut out);
        out
    }

    /// Drop values under the exact `pattern` for which `predicate` holds.
    /// Returns whether anything was removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut root = self.write();
        let mut node = &mut *root;
        for segment in levels(pattern) {
            let next = match segment {
                "#" => {
                    let before = node.rest.len();
                    node.rest.retain(|v| !predicate(v));
                    return node.rest.len() < before;
                }
                "+" => node.single.as_deref_mut(),
                exact => node.children.get_mut(exact),
            };
            match next {
                Some(child) => node = child,
                None => return false,
            }
        }
        let before = node.values.len();
        node.values.retain(|v| !predicate(v));
        node.values.len() < before
    }

    /// Whether anything is registered under the exact `pattern` (no matching).
    pub fn has_pattern(&self, pattern: &str) -> bool {
        let root = self.read();
        let mut node = &*root;
        for segment in levels(pattern) {
            let next = match segment {
                "#" => return !node.rest.is_empty(),
                "+" => node.single.as_deref(),
                exact => node.children.get(exact),
            };
            match next {
                Some(child) => node = child,
                None => return false,
            }
        }
        !node.values.is_empty()
    }
}

impl<T: Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect<T: Clone>(node: &Node<T>, segments: &[&str], out: &mut Vec<T>) {
    // `#` covers this level and everything below it, including nothing.
    out.extend(node.rest.iter().cloned());

    let Some((first, rest)) = segments.split_first() else {
        out.extend(node.values.iter().cloned());
        return;
    };

    if let Some(child) = node.children.get(*first) {
        collect(child, rest, out);
    }
    if let Some(single) = node.single.as_deref() {
        collect(single, rest, out);
    }
}

fn levels(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
