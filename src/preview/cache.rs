//! Bounded preview cache keyed by content hash.
//!
//! Eviction is least-recently-inserted: a `VecDeque` remembers insertion
//! order, and re-inserting a key moves it to the back.

use std::collections::{HashMap, VecDeque};

use super::types::PreviewResponse;

#[derive(Debug)]
pub struct PreviewCache {
    capacity: usize,
    entries: HashMap<u64, PreviewResponse>,
    order: VecDeque<u64>,
}

impl PreviewCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: HashMap::with_capacity(capacity), order: VecDeque::with_capacity(capacity) }
    }

    #[must_use]
    pub fn get(&self, key: u64) -> Option<&PreviewResponse> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: u64, response: PreviewResponse) {
        if self.entries.insert(key, response).is_some() {
            self.order.retain(|k| *k != key);
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
