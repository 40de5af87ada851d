//! Task Queue
//!
//! Single-threaded cooperative scheduling over a virtual millisecond
//! clock. Timer callbacks and animation-frame callbacks both land here;
//! tasks with equal deadlines run in submission order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Virtual time in milliseconds since session start
pub type TimeMs = u64;

/// One animation-frame interval at 60fps
pub const FRAME_MS: TimeMs = 16;

struct Scheduled<T> {
    due: TimeMs,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so the BinaryHeap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Deadline-ordered task queue with a virtual clock
pub struct TaskQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    now: TimeMs,
    seq: u64,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            now: 0,
            seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> TimeMs {
        self.now
    }

    /// Schedule a task after a delay
    pub fn schedule_in(&mut self, delay: TimeMs, task: T) {
        let due = self.now + delay;
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Scheduled { due, seq, task });
    }

    /// Schedule a task for the next animation frame
    pub fn schedule_frame(&mut self, task: T) {
        self.schedule_in(FRAME_MS, task);
    }

    /// Pop the next task, advancing the clock to its deadline
    pub fn next(&mut self) -> Option<T> {
        let entry = self.heap.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Deadline of the next task without popping it
    pub fn peek_due(&self) -> Option<TimeMs> {
        self.heap.peek().map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
