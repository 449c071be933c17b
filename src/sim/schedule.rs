//! Deferred continuations
//!
//! A min-heap of events keyed by wake time. The owning loop drains whatever is
//! due each tick; nothing can be cancelled once scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry<E> {
    wake_at: f64,
    /// Insertion order, breaks ties so equal wake times fire FIFO
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wake_at
            .total_cmp(&other.wake_at)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Timer heap of pending events
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    next_seq: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at `now + delay`
    pub fn schedule(&mut self, now: f64, delay: f32, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            wake_at: now + delay as f64,
            seq,
            event,
        }));
    }

    /// Remove and return every event due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: f64) -> Vec<E> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|Reverse(e)| e.wake_at <= now) {
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Wake time of the earliest pending event
    pub fn next_wake(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(e)| e.wake_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_wake_order() {
        let mut sched = Scheduler::new();
        sched.schedule(0.0, 2.5, "late");
        sched.schedule(0.0, 1.0, "early");
        sched.schedule(0.5, 0.5, "tie");

        assert!(sched.drain_due(0.9).is_empty());
        assert_eq!(sched.drain_due(1.0), vec!["early", "tie"]);
        assert_eq!(sched.next_wake(), Some(2.5));
        assert_eq!(sched.drain_due(10.0), vec!["late"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_same_wake_time_is_fifo() {
        let mut sched = Scheduler::new();
        for i in 0..5 {
            sched.schedule(1.0, 1.0, i);
        }
        assert_eq!(sched.drain_due(2.0), vec![0, 1, 2, 3, 4]);
    }
}
