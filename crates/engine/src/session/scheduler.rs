use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot deferred work on the session's update loop.
pub trait Scheduler {
    fn schedule(&mut self, after: Duration) -> TimerHandle;
    /// Returns `false` when the timer already fired or was never armed.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
}

/// Cooperative timer queue driven by elapsed simulation time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    /// Moves the clock forward and returns every timer that came due, ordered
    /// by deadline and then by arming order.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let mut due = Vec::new();
        self.pending.retain(|timer| {
            if timer.deadline <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.deadline, timer.handle));
        due.into_iter().map(|timer| timer.handle).collect()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, after: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.pending.push(PendingTimer {
            handle,
            deadline: self.now.saturating_add(after),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }
}
