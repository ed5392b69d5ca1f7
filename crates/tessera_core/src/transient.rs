//! Transient state - flash an alternate value, then revert
//!
//! [`TransientState`] holds a base value and an alternate supplier.
//! [`trigger`](TransientState::trigger) shows the alternate right away and
//! schedules a single revert timer on the [`TimerScheduler`](crate::scheduler::TimerScheduler).
//! Triggering again while flashing cancels the pending revert and restarts the
//! window from the new trigger, so there is never more than one timer in
//! flight per instance.
//!
//! ```text
//!            trigger              timer
//!   Idle ─────────────▶ Flashing ───────▶ Idle
//!                        │    ▲
//!                        └────┘ trigger (window restarts)
//! ```
//!
//! Disposal cancels the pending timer and freezes the state; a timer callback
//! that races with disposal sees the generation mismatch and does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::mount::Disposable;
use crate::scheduler::{SchedulerHandle, TimerId};

/// How long the alternate value stays visible
///
/// Built from a signed millisecond count; anything `<= 0` reverts on the next
/// scheduler tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlashDuration(i64);

impl FlashDuration {
    pub const fn from_millis_signed(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn as_millis_signed(&self) -> i64 {
        self.0
    }

    /// Delay to hand to the scheduler
    pub fn delay(&self) -> Duration {
        if self.0 <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(self.0 as u64)
        }
    }
}

impl Default for FlashDuration {
    fn default() -> Self {
        Self(1000)
    }
}

impl From<Duration> for FlashDuration {
    fn from(d: Duration) -> Self {
        Self(i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TransientPhase {
    #[default]
    Idle,
    Flashing,
}

type Supplier<T> = Rc<dyn Fn() -> T>;
type Observer<T> = Rc<dyn Fn(&T)>;

struct TransientInner<T> {
    base: T,
    current: T,
    alternate: Supplier<T>,
    duration: FlashDuration,
    phase: TransientPhase,
    pending: Option<TimerId>,
    /// Bumped on every trigger and on disposal
    generation: u64,
    disposed: bool,
    reversions: u64,
    observers: Vec<Observer<T>>,
}

/// A value that temporarily switches to an alternate and reverts on a timer
pub struct TransientState<T> {
    inner: Rc<RefCell<TransientInner<T>>>,
    scheduler: SchedulerHandle,
}

impl<T> Clone for TransientState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> TransientState<T> {
    pub fn new(
        scheduler: SchedulerHandle,
        base: T,
        alternate: impl Fn() -> T + 'static,
        duration: FlashDuration,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TransientInner {
                current: base.clone(),
                base,
                alternate: Rc::new(alternate),
                duration,
                phase: TransientPhase::Idle,
                pending: None,
                generation: 0,
                disposed: false,
                reversions: 0,
                observers: Vec::new(),
            })),
            scheduler,
        }
    }

    /// Value to render right now
    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn base(&self) -> T {
        self.inner.borrow().base.clone()
    }

    pub fn phase(&self) -> TransientPhase {
        self.inner.borrow().phase
    }

    pub fn is_flashing(&self) -> bool {
        self.phase() == TransientPhase::Flashing
    }

    pub fn duration(&self) -> FlashDuration {
        self.inner.borrow().duration
    }

    /// Number of completed reverts
    pub fn reversions(&self) -> u64 {
        self.inner.borrow().reversions
    }

    /// Whether a revert timer is waiting
    pub fn has_pending_revert(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Register an observer called whenever the visible value changes
    pub fn on_change(&self, observer: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().observers.push(Rc::new(observer));
    }

    /// Change the revert target
    ///
    /// Visible at once while idle; while flashing it takes effect on revert.
    pub fn set_base(&self, base: T) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.base = base.clone();
            if inner.phase == TransientPhase::Idle && inner.current != base {
                inner.current = base.clone();
                true
            } else {
                false
            }
        };
        if changed {
            self.notify(&base);
        }
    }

    pub fn set_alternate(&self, alternate: impl Fn() -> T + 'static) {
        self.inner.borrow_mut().alternate = Rc::new(alternate);
    }

    /// Applies to the next trigger
    pub fn set_duration(&self, duration: FlashDuration) {
        self.inner.borrow_mut().duration = duration;
    }

    /// Show the alternate now and (re)start the revert window
    pub fn trigger(&self) {
        let (supplier, previous) = {
            let inner = self.inner.borrow();
            if inner.disposed {
                return;
            }
            (inner.alternate.clone(), inner.pending)
        };
        let alternate = supplier();

        if let Some(id) = previous {
            self.scheduler.cancel(id);
        }

        let (generation, delay, changed) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.pending = None;
            inner.phase = TransientPhase::Flashing;
            let changed = inner.current != alternate;
            inner.current = alternate.clone();
            (inner.generation, inner.duration.delay(), changed)
        };

        let weak = Rc::downgrade(&self.inner);
        let scheduled = self
            .scheduler
            .schedule(delay, move || revert(&weak, generation));

        match scheduled {
            Some(id) => self.inner.borrow_mut().pending = Some(id),
            None => {
                tracing::warn!("scheduler gone, reverting transient state immediately");
                if changed {
                    self.notify(&alternate);
                }
                revert(&Rc::downgrade(&self.inner), generation);
                return;
            }
        }

        if changed {
            self.notify(&alternate);
        }
    }

    fn notify(&self, value: &T) {
        let observers = self.inner.borrow().observers.clone();
        for observer in observers {
            observer(value);
        }
    }
}

fn revert<T: Clone + PartialEq + 'static>(weak: &Weak<RefCell<TransientInner<T>>>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let (observers, base) = {
        let mut state = inner.borrow_mut();
        if state.disposed || state.generation != generation {
            return;
        }
        state.pending = None;
        state.phase = TransientPhase::Idle;
        state.reversions += 1;
        let changed = state.current != state.base;
        state.current = state.base.clone();
        if !changed {
            return;
        }
        (state.observers.clone(), state.base.clone())
    };
    for observer in observers {
        observer(&base);
    }
}

impl<T> Disposable for TransientState<T> {
    fn dispose(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.generation += 1;
            inner.phase = TransientPhase::Idle;
            inner.observers.clear();
            inner.pending.take()
        };
        if let Some(id) = pending {
            self.scheduler.cancel(id);
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }
}

impl<T: fmt::Debug> fmt::Debug for TransientState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TransientState")
            .field("current", &inner.current)
            .field("phase", &inner.phase)
            .field("pending", &inner.pending.is_some())
            .finish()
    }
}
