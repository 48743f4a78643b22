//! Cooperative timer queue for the simulation's suspended tasks.
//!
//! Every wait in the game loop (spawn poll, timeout watchdog, target refresh,
//! deferred commands, cooldown, fall-then-destroy) is a task parked here
//! until its due time. The session drives the queue one tick at a time:
//! [`Scheduler::begin_tick`] advances the clock and [`Scheduler::pop_due`]
//! hands back ready tasks in `(due time, arming order)` order.
//!
//! A timer armed while tick `k` is being processed never fires during tick
//! `k`, even with a zero delay. Deferred commands rely on this to run
//! strictly after the tick that constructed their target.

use std::collections::BTreeMap;
use std::time::Duration;

use hashbrown::HashMap;

/// Opaque handle identifying a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub(crate) u64);

#[derive(Debug)]
struct Pending<T> {
    task: T,
    /// First tick on which the timer may fire.
    min_tick: u64,
}

/// Single-threaded timer queue keyed by due time.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    tick: u64,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Pending<T>>,
    due_by_seq: HashMap<u64, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler at time zero, before the first tick.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            tick: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_by_seq: HashMap::new(),
        }
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of ticks begun so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Parks `task` until `delay` has elapsed.
    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TimerHandle {
        let due = self.now.saturating_add(delay);
        self.insert(due, self.tick + 1, task)
    }

    /// Parks `task` until `ticks` further tick boundaries have passed.
    ///
    /// A value of zero is treated as one: a deferred task never runs in the
    /// tick that armed it.
    pub fn defer_ticks(&mut self, ticks: u32, task: T) -> TimerHandle {
        let min_tick = self.tick + u64::from(ticks.max(1));
        self.insert(self.now, min_tick, task)
    }

    fn insert(&mut self, due: Duration, min_tick: u64, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), Pending { task, min_tick });
        self.due_by_seq.insert(seq, due);
        TimerHandle(seq)
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(due) = self.due_by_seq.remove(&handle.0) else {
            return false;
        };
        self.queue.remove(&(due, handle.0)).is_some()
    }

    /// Whether `handle` has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_seq.contains_key(&handle.0)
    }

    /// Time left until `handle` is due, if it is still pending.
    #[must_use]
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.due_by_seq
            .get(&handle.0)
            .map(|due| due.saturating_sub(self.now))
    }

    /// Starts the next tick, advancing the clock by `delta`.
    pub fn begin_tick(&mut self, delta: Duration) {
        self.tick += 1;
        self.now = self.now.saturating_add(delta);
    }

    /// Removes and returns the earliest task that is ready in this tick.
    ///
    /// Tasks armed while the current tick is processed are skipped until a
    /// later tick, so draining in a loop always terminates.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, T)> {
        let key = self
            .queue
            .iter()
            .take_while(|((due, _), _)| *due <= self.now)
            .find(|(_, pending)| pending.min_tick <= self.tick)
            .map(|(key, _)| *key)?;
        let pending = self.queue.remove(&key)?;
        self.due_by_seq.remove(&key.1);
        Some((TimerHandle(key.1), pending.task))
    }
}
