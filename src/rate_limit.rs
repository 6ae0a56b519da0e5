//! Debounce and throttle wrappers over the host's timers.

use crate::host::{TimerId, Timers};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct DebounceState<T: Timers + ?Sized, A> {
    timers: Rc<T>,
    delay_ms: u32,
    action: Rc<dyn Fn(A)>,
    pending: Cell<Option<TimerId>>,
    last_arg: RefCell<Option<A>>,
}

/// Runs the action once calls stop arriving for `delay_ms`, with the most
/// recent argument. Every call restarts the wait.
pub struct Debounced<T: Timers + ?Sized, A> {
    state: Rc<DebounceState<T, A>>,
}

impl<T: Timers + ?Sized + 'static, A: 'static> Debounced<T, A> {
    pub fn new(timers: Rc<T>, delay_ms: u32, action: impl Fn(A) + 'static) -> Self {
        Self {
            state: Rc::new(DebounceState {
                timers,
                delay_ms,
                action: Rc::new(action),
                pending: Cell::new(None),
                last_arg: RefCell::new(None),
            }),
        }
    }

    pub fn call(&self, arg: A) {
        let s = &self.state;
        if let Some(id) = s.pending.take() {
            s.timers.clear_timeout(id);
        }
        *s.last_arg.borrow_mut() = Some(arg);
        let state = self.state.clone();
        let id = s.timers.set_timeout(
            s.delay_ms,
            Box::new(move || {
                state.pending.set(None);
                let arg = state.last_arg.borrow_mut().take();
                if let Some(arg) = arg {
                    (state.action)(arg);
                }
            }),
        );
        s.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(id) = self.state.pending.take() {
            self.state.timers.clear_timeout(id);
        }
        self.state.last_arg.borrow_mut().take();
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}

impl<T: Timers + ?Sized, A> Clone for Debounced<T, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

struct ThrottleState<T: Timers + ?Sized, A> {
    timers: Rc<T>,
    interval_ms: u32,
    action: Rc<dyn Fn(A)>,
    window: Cell<Option<TimerId>>,
}

/// Runs the action immediately, then drops calls until `interval_ms` has
/// passed.
pub struct Throttled<T: Timers + ?Sized, A> {
    state: Rc<ThrottleState<T, A>>,
}

impl<T: Timers + ?Sized + 'static, A: 'static> Throttled<T, A> {
    pub fn new(timers: Rc<T>, interval_ms: u32, action: impl Fn(A) + 'static) -> Self {
        Self {
            state: Rc::new(ThrottleState {
                timers,
                interval_ms,
                action: Rc::new(action),
                window: Cell::new(None),
            }),
        }
    }

    /// Returns whether the action ran.
    pub fn call(&self, arg: A) -> bool {
        let s = &self.state;
        if self.is_blocked() {
            return false;
        }
        let state = self.state.clone();
        let id = s.timers.set_timeout(
            s.interval_ms,
            Box::new(move || state.window.set(None)),
        );
        s.window.set(Some(id));
        (s.action)(arg);
        true
    }

    pub fn cancel(&self) {
        if let Some(id) = self.state.window.take() {
            self.state.timers.clear_timeout(id);
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.state.window.get().is_some()
    }
}

impl<T: Timers + ?Sized, A> Clone for Throttled<T, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

pub fn debounce<T, A>(timers: Rc<T>, delay_ms: u32, action: impl Fn(A) + 'static) -> Debounced<T, A>
where
    T: Timers + ?Sized + 'static,
    A: 'static,
{
    Debounced::new(timers, delay_ms, action)
}

pub fn throttle<T, A>(timers: Rc<T>, interval_ms: u32, action: impl Fn(A) + 'static) -> Throttled<T, A>
where
    T: Timers + ?Sized + 'static,
    A: 'static,
{
    Throttled::new(timers, interval_ms, action)
}

/// A JS number of milliseconds as a delay. Negative, NaN and infinite values
/// become 0.
#[inline]
pub fn clamp_millis(value: f64) -> u32 {
    if value.is_finite() {
        value.clamp(0.0, u32::MAX as f64) as u32
    } else {
        0
    }
}
