//! Insertion Order Module
//!
//! Tracks cached keys by insertion time for oldest-first eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keeps keys sorted by insertion timestamp.
///
/// Keys are stored in a VecDeque where:
/// - Front = oldest insertion
/// - Back = newest insertion
///
/// Keys inserted at the same millisecond keep their arrival order. Reads never
/// reorder the queue; only a re-insert moves a key.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<(u64, String)>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records `key` as inserted at `inserted_at`.
    ///
    /// An existing occurrence of the key is dropped first.
    pub fn record(&mut self, key: &str, inserted_at: u64) {
        self.remove(key);
        let pos = self.order.partition_point(|(ts, _)| *ts <= inserted_at);
        self.order.insert(pos, (inserted_at, key.to_string()));
    }

    // == Remove ==
    /// Removes a key from the queue.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|(_, k)| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key, or None if the queue is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.front().map(|(_, key)| key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|(_, k)| k == key)
    }
}
