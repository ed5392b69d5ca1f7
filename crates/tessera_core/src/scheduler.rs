//! Timer scheduler
//!
//! A single-threaded, cooperative timer queue driven by the host's event loop.
//! The scheduler keeps its own clock: the host calls [`TimerScheduler::advance`]
//! with the elapsed time (or [`TimerScheduler::tick`] to flush timers that are
//! already due), and callbacks run in deadline order on the calling thread.
//!
//! - A timer scheduled with a zero delay is due immediately but only fires on
//!   the next `tick`/`advance`, never inside `schedule`.
//! - Cancelling removes the timer outright; a cancelled timer never fires,
//!   even if its deadline has already passed.
//! - Callbacks may schedule and cancel timers. Timers scheduled while a tick
//!   is running fire on a later pass.
//!
//! Components hold a [`SchedulerHandle`], a weak reference that becomes inert
//! once the scheduler is dropped.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// One-shot timer callback
pub type TimerCallback = Box<dyn FnOnce()>;

struct TimerEntry {
    deadline: Duration,
    /// Insertion order, breaks deadline ties
    seq: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct SchedulerInner {
    timers: SlotMap<TimerId, TimerEntry>,
    now: Duration,
    next_seq: u64,
    fired: u64,
}

impl SchedulerInner {
    fn schedule(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now + delay;
        let id = self.timers.insert(TimerEntry {
            deadline,
            seq,
            callback,
        });
        tracing::trace!(?id, ?deadline, "timer scheduled");
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(id).is_some();
        if removed {
            tracing::trace!(?id, "timer cancelled");
        }
        removed
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }
}

/// Fire every timer due at the current time, in deadline order
fn run_due(inner: &Rc<RefCell<SchedulerInner>>) -> usize {
    let due: Vec<TimerId> = {
        let state = inner.borrow();
        let mut due: Vec<(Duration, u64, TimerId)> = state
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= state.now)
            .map(|(id, t)| (t.deadline, t.seq, id))
            .collect();
        due.sort_by_key(|&(deadline, seq, _)| (deadline, seq));
        due.into_iter().map(|(_, _, id)| id).collect()
    };

    let mut fired = 0;
    for id in due {
        // Earlier callbacks may have cancelled this one
        let entry = inner.borrow_mut().timers.remove(id);
        if let Some(entry) = entry {
            tracing::trace!(?id, "timer fired");
            (entry.callback)();
            fired += 1;
        }
    }
    inner.borrow_mut().fired += fired as u64;
    fired
}

/// The timer queue owned by the host
pub struct TimerScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner::default())),
        }
    }

    /// Get a handle for components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current scheduler time
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn schedule(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        self.inner.borrow_mut().schedule(delay, Box::new(callback))
    }

    /// Cancel a pending timer; returns false if it already fired or was cancelled
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner.borrow_mut().cancel(id)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.contains_key(id)
    }

    /// Number of timers waiting to fire
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Total number of timers fired so far
    pub fn fired_count(&self) -> u64 {
        self.inner.borrow().fired
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner.borrow().next_deadline()
    }

    /// Fire the timers that are due without moving the clock
    pub fn tick(&self) -> usize {
        run_due(&self.inner)
    }

    /// Move the clock forward by `by`, firing timers as their deadlines pass
    ///
    /// Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Move the clock to `target` (no-op for times in the past)
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let next = self.inner.borrow().next_deadline();
            match next {
                Some(deadline) if deadline <= target => {
                    {
                        let mut state = self.inner.borrow_mut();
                        state.now = state.now.max(deadline);
                    }
                    fired += run_due(&self.inner);
                }
                _ => break,
            }
        }
        let mut state = self.inner.borrow_mut();
        state.now = state.now.max(target);
        fired
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("TimerScheduler")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}

/// Weak handle to a [`TimerScheduler`]
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Schedule a callback; `None` if the scheduler is gone
    pub fn schedule(&self, delay: Duration, callback: impl FnOnce() + 'static) -> Option<TimerId> {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().schedule(delay, Box::new(callback));
        Some(id)
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.borrow_mut().cancel(id))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.borrow().timers.contains_key(id))
    }

    pub fn now(&self) -> Option<Duration> {
        self.inner.upgrade().map(|inner| inner.borrow().now)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| -> Box<dyn FnOnce()> {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let scheduler = TimerScheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(ms(300), make("c"));
        scheduler.schedule(ms(100), make("a"));
        scheduler.schedule(ms(200), make("b"));

        assert_eq!(scheduler.advance(ms(250)), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(scheduler.now(), ms(250));

        scheduler.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.fired_count(), 3);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let scheduler = TimerScheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(ms(100), make("first"));
        scheduler.schedule(ms(100), make("second"));
        scheduler.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let scheduler = TimerScheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(ms(1000), make("done"));
        scheduler.advance(ms(999));
        assert!(log.borrow().is_empty());
        scheduler.advance(ms(1));
        assert_eq!(*log.borrow(), vec!["done"]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let scheduler = TimerScheduler::new();
        let (log, make) = recorder();
        let id = scheduler.schedule(ms(10), make("cancelled"));
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(ms(100));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_cancel_from_earlier_callback_wins() {
        let scheduler = Rc::new(TimerScheduler::new());
        let (log, make) = recorder();
        let victim = Rc::new(RefCell::new(None));

        let s = scheduler.clone();
        let v = victim.clone();
        scheduler.schedule(ms(10), move || {
            if let Some(id) = v.borrow_mut().take() {
                s.cancel(id);
            }
        });
        *victim.borrow_mut() = Some(scheduler.schedule(ms(10), make("victim")));

        // Both are due in the same pass; the first cancels the second
        scheduler.advance(ms(10));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_zero_delay_waits_for_next_tick() {
        let scheduler = TimerScheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(Duration::ZERO, make("now"));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.tick(), 1);
        assert_eq!(*log.borrow(), vec!["now"]);
    }

    #[test]
    fn test_timer_scheduled_during_tick_runs_later() {
        let scheduler = Rc::new(TimerScheduler::new());
        let (log, make) = recorder();
        let s = scheduler.clone();
        let follow_up = RefCell::new(Some(make("follow-up")));
        scheduler.schedule(Duration::ZERO, move || {
            if let Some(cb) = follow_up.borrow_mut().take() {
                s.schedule(Duration::ZERO, cb);
            }
        });

        assert_eq!(scheduler.tick(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.tick(), 1);
        assert_eq!(*log.borrow(), vec!["follow-up"]);
    }

    #[test]
    fn test_advance_fires_chained_timers_within_window() {
        let scheduler = Rc::new(TimerScheduler::new());
        let (log, make) = recorder();
        let s = scheduler.clone();
        let second = RefCell::new(Some(make("second")));
        scheduler.schedule(ms(100), move || {
            if let Some(cb) = second.borrow_mut().take() {
                s.schedule(ms(100), cb);
            }
        });

        scheduler.advance(ms(250));
        assert_eq!(*log.borrow(), vec!["second"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_handle_after_drop() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        assert!(handle.is_alive());
        let id = handle.schedule(ms(5), || {}).unwrap();
        assert!(handle.is_pending(id));

        drop(scheduler);
        assert!(!handle.is_alive());
        assert!(handle.schedule(ms(5), || {}).is_none());
        assert!(!handle.cancel(id));
        assert_eq!(handle.now(), None);
    }
}
