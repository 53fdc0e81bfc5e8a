//! Unbounded pairing of pending events and waiting consumers
//!
//! At rest at most one side is non-empty: a push hands the item straight to
//! the oldest waiting consumer when there is one, and a registration consumes
//! the oldest pending item when there is one. Items reach consumers in push
//! order.

use std::collections::VecDeque;
use std::fmt;

/// One-shot consumer waiting for the next item
pub type Callback<T> = Box<dyn FnOnce(T) + Send>;

pub struct Channel<T> {
    pending: VecDeque<T>,
    waiting: VecDeque<Callback<T>>,
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            waiting: VecDeque::new(),
        }
    }

    /// Hand `item` to the oldest waiting callback, or queue it.
    ///
    /// The callback runs before `push` returns and must not re-enter the
    /// channel.
    pub fn push(&mut self, item: T) {
        match self.waiting.pop_front() {
            Some(callback) => callback(item),
            None => self.pending.push_back(item),
        }
    }

    /// Run `callback` with the oldest pending item, or park it until the next push
    pub fn register(&mut self, callback: Callback<T>) {
        match self.pending.pop_front() {
            Some(item) => callback(item),
            None => self.waiting.push_back(callback),
        }
    }

    /// Number of queued items
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of parked callbacks
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Remove every queued item, oldest first
    pub fn drain_pending(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pending.drain(..)
    }

    /// Drop every parked callback without invoking it
    pub fn clear_waiting(&mut self) {
        self.waiting.clear();
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("pending", &self.pending.len())
            .field("waiting", &self.waiting.len())
            .finish()
    }
}
