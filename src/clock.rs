//! Clock and timer queue.
//!
//! All time in spark-folio is a [`Duration`] since the clock's origin.
//! The app runs on [`SystemClock`]; tests drive a [`ManualClock`] so that
//! animation and tile timers are fully deterministic.
//!
//! [`TimerQueue`] is the cancellable scheduled-callback primitive the tile
//! grid uses instead of ad-hoc listener registration: schedule a key at a
//! deadline, cancel it by id, drain whatever is due.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

// =============================================================================
// Clock
// =============================================================================

/// Source of monotonic time.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Jump to an absolute time. Never moves backwards.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

// =============================================================================
// Timer Queue
// =============================================================================

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Deadline-ordered queue of cancellable timers carrying a key.
///
/// Timers with equal deadlines fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<K> {
    next_id: u64,
    pending: BTreeMap<(Duration, u64), K>,
    deadlines: HashMap<u64, Duration>,
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `key` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, key: K) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((deadline, id), key);
        self.deadlines.insert(id, deadline);
        TimerId(id)
    }

    /// Cancel a pending timer. Returns the key if the timer had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<K> {
        let deadline = self.deadlines.remove(&id.0)?;
        self.pending.remove(&(deadline, id.0))
    }

    /// Check whether a timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Remove and return every timer whose deadline is `<= now`, in firing order.
    pub fn pop_due(&mut self, now: Duration) -> Vec<(TimerId, K)> {
        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            let key = entry.remove();
            self.deadlines.remove(&id);
            due.push((TimerId(id), key));
        }
        due
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(ms(250));
        clock.advance(ms(250));
        assert_eq!(clock.now(), ms(500));

        // set never goes backwards
        clock.set(ms(100));
        assert_eq!(clock.now(), ms(500));
        clock.set(ms(900));
        assert_eq!(clock.now(), ms(900));
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "c");
        queue.schedule(ms(100), "a");
        queue.schedule(ms(200), "b");

        assert_eq!(queue.next_deadline(), Some(ms(100)));

        let due: Vec<_> = queue.pop_due(ms(250)).into_iter().map(|(_, k)| k).collect();
        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);

        let due: Vec<_> = queue.pop_due(ms(1000)).into_iter().map(|(_, k)| k).collect();
        assert_eq!(due, vec!["c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_deadlines_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(100), 1);
        queue.schedule(ms(100), 2);
        queue.schedule(ms(100), 3);

        let due: Vec<_> = queue.pop_due(ms(100)).into_iter().map(|(_, k)| k).collect();
        assert_eq!(due, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(ms(100), "x");
        assert!(queue.is_pending(id));

        assert_eq!(queue.cancel(id), Some("x"));
        assert!(!queue.is_pending(id));
        assert!(queue.pop_due(ms(1000)).is_empty());

        // Cancelling twice is a no-op
        assert_eq!(queue.cancel(id), None);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(ms(100), "x");
        assert_eq!(queue.pop_due(ms(100)).len(), 1);
        assert_eq!(queue.cancel(id), None);
    }
}
