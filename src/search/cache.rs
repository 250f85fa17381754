//! Suggestion caches.
//!
//! The matcher never owns a cache. Callers hand one in, which keeps the
//! matcher free of global state and leaves the eviction policy to them.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use super::MatchResult;

/// Memoizes suggestion lists by exact (case-sensitive) query string.
pub trait SuggestionCache {
    /// Returns a previously stored result for `query`.
    fn lookup(&mut self, query: &str) -> Option<Vec<MatchResult>>;

    /// Stores the result computed for `query`.
    fn store(&mut self, query: &str, results: &[MatchResult]);
}

/// A cache that never remembers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl SuggestionCache for NoCache {
    fn lookup(&mut self, _query: &str) -> Option<Vec<MatchResult>> {
        None
    }

    fn store(&mut self, _query: &str, _results: &[MatchResult]) {}
}

/// Simple bounded LRU cache.
///
/// A capacity of zero disables storage entirely.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    items: HashMap<K, V>,
    /// Least recently used at the front.
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.items.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.items.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if !self.items.contains_key(&key) && self.items.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.items.remove(&oldest);
            }
        }
        self.touch(&key);
        self.items.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &K) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.clone());
    }
}

impl SuggestionCache for LruCache<String, Vec<MatchResult>> {
    fn lookup(&mut self, query: &str) -> Option<Vec<MatchResult>> {
        self.get(&query.to_owned()).cloned()
    }

    fn store(&mut self, query: &str, results: &[MatchResult]) {
        self.insert(query.to_owned(), results.to_vec());
    }
}
