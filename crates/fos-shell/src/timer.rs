//! One-shot timers driven by the UI event loop.
//!
//! Nothing here sleeps. The event loop asks for `next_deadline` to pick its
//! wake-up time and hands every due event back to the shell. Timers are
//! never cancelled; consumers re-check their state when one fires.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Scheduled<E> {
    deadline: Instant,
    seq: u64,
    event: E,
}

/// Fixed-delay one-shot timer queue.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: Vec<Scheduled<E>>,
    next_seq: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Fire `event` once `delay` has elapsed after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            deadline: now + delay,
            seq,
            event,
        });
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Remove and return every event due at `now`, earliest first.
    /// Events with equal deadlines keep their scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Vec<E> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.deadline, entry.seq));
        due.into_iter().map(|entry| entry.event).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pending events in no particular order.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|entry| &entry.event)
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
