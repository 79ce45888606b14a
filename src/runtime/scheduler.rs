//! Virtual-clock timer queue
//!
//! Deferred continuations ordered by deadline, FIFO among equal deadlines.
//! The clock only moves when the runtime advances it, which makes deferred
//! behavior (debounced batch processing) fully deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deferred unit of work. Continuations re-read live tree state when they
/// run; they must not cache anything across the suspension beyond the
/// previous/current values needed for actionability checks.
pub type Continuation<T> = Box<dyn FnOnce(&mut T)>;

struct TimerEvent<T> {
    deadline_ms: u64,
    seq: u64,
    run: Continuation<T>,
}

impl<T> PartialEq for TimerEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_ms == other.deadline_ms && self.seq == other.seq
    }
}

impl<T> Eq for TimerEvent<T> {}

impl<T> PartialOrd for TimerEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TimerEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: earlier deadlines first, then scheduling order
        other
            .deadline_ms
            .cmp(&self.deadline_ms)
            .then(other.seq.cmp(&self.seq))
    }
}

/// Timer queue over a virtual millisecond clock.
pub struct Scheduler<T> {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<TimerEvent<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `run` to execute `delay_ms` from now. Not cancellable, not
    /// deduplicated.
    pub fn schedule(&mut self, delay_ms: u64, run: impl FnOnce(&mut T) + 'static) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(TimerEvent {
            deadline_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            run: Box::new(run),
        });
    }

    /// Deadline of the next pending continuation.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.peek().map(|ev| ev.deadline_ms)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the next continuation regardless of deadline, jumping the clock
    /// forward to it.
    pub fn pop_next(&mut self) -> Option<Continuation<T>> {
        let ev = self.queue.pop()?;
        self.now_ms = self.now_ms.max(ev.deadline_ms);
        Some(ev.run)
    }

    /// Pop the next continuation only if it is due at or before `limit_ms`,
    /// jumping the clock to its deadline.
    pub fn pop_due(&mut self, limit_ms: u64) -> Option<Continuation<T>> {
        if self.next_deadline()? > limit_ms {
            return None;
        }
        self.pop_next()
    }

    /// Move the clock forward to `target_ms` (never backwards).
    pub fn advance_clock_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_order(scheduler: &mut Scheduler<Vec<u32>>) -> Vec<u32> {
        let mut ran = Vec::new();
        while let Some(run) = scheduler.pop_next() {
            run(&mut ran);
        }
        ran
    }

    #[test]
    fn earlier_deadlines_run_first() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        scheduler.schedule(500, |out| out.push(2));
        scheduler.schedule(100, |out| out.push(1));
        scheduler.schedule(900, |out| out.push(3));

        assert_eq!(drain_order(&mut scheduler), vec![1, 2, 3]);
        assert_eq!(scheduler.now(), 900);
    }

    #[test]
    fn equal_deadlines_run_in_scheduling_order() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        for i in 0..5 {
            scheduler.schedule(500, move |out| out.push(i));
        }
        assert_eq!(drain_order(&mut scheduler), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn pop_due_respects_limit() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        scheduler.schedule(100, |out| out.push(1));
        scheduler.schedule(600, |out| out.push(2));

        assert!(scheduler.pop_due(50).is_none());
        assert!(scheduler.pop_due(100).is_some());
        assert!(scheduler.pop_due(100).is_none());
        assert_eq!(scheduler.next_deadline(), Some(600));
    }

    #[test]
    fn delays_compound_from_current_time() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        scheduler.schedule(100, |out| out.push(1));
        let run = scheduler.pop_next().unwrap();
        let mut out = Vec::new();
        run(&mut out);

        // Scheduled after the clock moved to 100, so due at 350
        scheduler.schedule(250, |out| out.push(2));
        assert_eq!(scheduler.next_deadline(), Some(350));
    }
}
