//! Deferred request delivery
//!
//! Holds issued requests so a test decides when, and in what order, each one
//! is fetched and completed.

use std::collections::VecDeque;

/// Requests waiting to be resolved
#[derive(Debug, Clone)]
pub struct DeferredQueue<R> {
    pending: VecDeque<R>,
}

impl<R> DeferredQueue<R> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Parks a request
    pub fn push(&mut self, request: R) {
        self.pending.push_back(request);
    }

    /// Removes the earliest parked request
    pub fn pop_oldest(&mut self) -> Option<R> {
        self.pending.pop_front()
    }

    /// Removes the latest parked request
    pub fn pop_newest(&mut self) -> Option<R> {
        self.pending.pop_back()
    }

    /// Removes the request at `index` in issue order
    pub fn take(&mut self, index: usize) -> Option<R> {
        self.pending.remove(index)
    }

    /// Removes every request, newest first
    pub fn drain_newest_first(&mut self) -> Vec<R> {
        self.pending.drain(..).rev().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<R> Default for DeferredQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}
