use tracing::trace;

/// Identifies one scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<T> {
    handle: TimerHandle,
    at_ms: f64,
    task: T,
}

/// Cooperative, single-threaded timer queue.
///
/// Tasks are registered fire-and-forget with a delay relative to the
/// scheduler's clock. The owner drives the clock and drains due tasks one at
/// a time, so each task runs to completion before the next is popped. Tasks
/// due at the same instant come out in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_handle: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_handle: 0,
            pending: Vec::with_capacity(8),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Registers `task` to fire `delay_ms` from now. Negative delays fire
    /// at the current instant.
    pub fn schedule(&mut self, delay_ms: f64, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let at_ms = self.now_ms + delay_ms.max(0.0);
        trace!(?handle, at_ms, "timer scheduled");
        self.pending.push(Pending { handle, at_ms, task });
        handle
    }

    /// Drops a pending task. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(index) => {
                self.pending.swap_remove(index);
                trace!(?handle, "timer cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Time of the earliest pending task.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.at_ms).reduce(f64::min)
    }

    /// Removes and returns the earliest task due at or before `until_ms`,
    /// moving the clock to that task's time.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<T> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.at_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.at_ms.total_cmp(&b.at_ms).then(a.handle.cmp(&b.handle)))
            .map(|(index, _)| index)?;

        let due = self.pending.swap_remove(index);
        self.now_ms = self.now_ms.max(due.at_ms);
        Some(due.task)
    }

    /// Moves the clock forward without running anything.
    pub fn advance_to(&mut self, time_ms: f64) {
        self.now_ms = self.now_ms.max(time_ms);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
