//! Keyed one-shot timers on a host-supplied clock.
//!
//! Each key has at most one pending deadline. Scheduling a key again replaces its
//! previous deadline, so superseded work can never fire stale.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    key: K,
    deadline: Duration,
    seq: u64,
}

impl<K: Copy + Eq> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Arms `key` to fire at `deadline`, cancelling any earlier arming of the same key.
    pub fn schedule(&mut self, key: K, deadline: Duration) {
        self.cancel(key);
        self.entries.push(Entry {
            key,
            deadline,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Returns true if a pending timer was removed.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn deadline(&self, key: K) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Removes and returns the earliest timer due at `now`, with its deadline.
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Duration) -> Option<(K, Duration)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.key, entry.deadline))
    }
}

impl<K: Copy + Eq> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
