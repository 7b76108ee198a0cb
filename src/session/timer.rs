use std::time::{Duration, Instant};

pub const DEFAULT_FLIP_DEBOUNCE: Duration = Duration::from_millis(600);
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub flip_debounce: Duration,
    pub advance_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            flip_debounce: DEFAULT_FLIP_DEBOUNCE,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// The flip debounce window has closed.
    FlipSettled,
    /// Move on to the next card after feedback.
    Advance,
}

/// Deadline-ordered deferred work, driven by the host calling `take_due`.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Vec<(TaskId, Instant, Deferred)>,
}

impl Scheduler {
    pub fn schedule(&mut self, at: Instant, task: Deferred) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, at, task));
        id
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _, _)| *pending != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|(pending, _, _)| *pending == id)
    }

    /// Remove and return every task due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TaskId, Deferred)> {
        let mut due: Vec<(TaskId, Instant, Deferred)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(id, at, _)| (*at, id.0));
        due.into_iter().map(|(id, _, task)| (id, task)).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at, _)| *at).min()
    }
}
