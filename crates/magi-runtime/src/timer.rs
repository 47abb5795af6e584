//! Wall-clock timers that run independently of animation frames

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry<T> {
    due_ms: f64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest timer; ties fire in schedule order
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One-shot timers keyed by due time, fired by polling with the current time
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    live: HashSet<u64>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `payload` once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(seq);
        self.heap.push(Entry {
            due_ms,
            seq,
            payload,
        });
        TimerId(seq)
    }

    /// Fire `payload` `delay_ms` after `now_ms`
    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerId {
        self.schedule(now_ms + delay_ms.max(0.0), payload)
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id.0)
    }

    /// Pop the earliest timer due at `now_ms`, if any
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T> {
        loop {
            let due = self.heap.peek()?.due_ms;
            if due > now_ms {
                return None;
            }
            let entry = self.heap.pop()?;
            if self.live.remove(&entry.seq) {
                return Some(entry.payload);
            }
        }
    }

    /// Due time of the earliest live timer
    pub fn next_due(&mut self) -> Option<f64> {
        while let Some(entry) = self.heap.peek() {
            if self.live.contains(&entry.seq) {
                return Some(entry.due_ms);
            }
            self.heap.pop();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Collapses a burst of triggers into one firing `delay_ms` after the last
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Restart the countdown
    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// True exactly once when the countdown has elapsed
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(30.0, "c");
        timers.schedule(10.0, "a");
        timers.schedule(20.0, "b");

        assert_eq!(timers.pop_due(5.0), None);
        assert_eq!(timers.pop_due(25.0), Some("a"));
        assert_eq!(timers.pop_due(25.0), Some("b"));
        assert_eq!(timers.pop_due(25.0), None);
        assert_eq!(timers.next_due(), Some(30.0));
        assert_eq!(timers.pop_due(100.0), Some("c"));
        assert!(timers.is_empty());
    }

    #[test]
    fn ties_fire_in_schedule_order() {
        let mut timers = TimerQueue::new();
        for i in 0..5 {
            timers.schedule(0.0, i);
        }
        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(0.0)).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(10.0, "a");
        timers.schedule(20.0, "b");
        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_due(), Some(20.0));
        assert_eq!(timers.pop_due(100.0), Some("b"));
    }

    #[test]
    fn schedule_after_clamps_negative_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(100.0, -50.0, ());
        assert_eq!(timers.next_due(), Some(100.0));
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let mut debounce = Debouncer::new(50.0);
        debounce.trigger(0.0);
        debounce.trigger(30.0);
        assert!(!debounce.poll(60.0));
        assert!(debounce.is_pending());
        assert!(debounce.poll(80.0));
        assert!(!debounce.poll(200.0));
        assert!(!debounce.is_pending());
    }
}
