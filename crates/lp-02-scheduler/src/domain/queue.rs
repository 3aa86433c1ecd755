//! Bounded priority queue of pending requests.

use crate::domain::request::PendingRequest;

/// Sorted vector of pending requests, ascending by priority.
///
/// `pop` returns the highest-priority request. When an insert would exceed
/// capacity, the lowest-priority entries are evicted first, so the incoming
/// request always lands even if it immediately becomes the eviction
/// candidate for the next insert.
#[derive(Debug)]
pub struct RequestQueue {
    entries: Vec<PendingRequest>,
    capacity: usize,
}

impl RequestQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Inserts a request at its sorted position, evicting from the low end
    /// when the queue is full. Equal-key requests insert before existing
    /// ones, so the oldest of an equal run pops last.
    pub fn insert(&mut self, request: PendingRequest) {
        if self.entries.len() >= self.capacity {
            let excess = self.entries.len() + 1 - self.capacity;
            self.entries.drain(..excess);
        }
        let at = self.entries.partition_point(|entry| entry < &request);
        self.entries.insert(at, request);
    }

    /// Removes and returns the highest-priority request.
    pub fn pop(&mut self) -> Option<PendingRequest> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
