#![forbid(unsafe_code)]

//! Host-clocked debounce and throttle wrappers.
//!
//! Scroll and resize streams arrive far faster than the page needs to react.
//! This module provides two temporal contracts:
//!
//! - [`Debounce`]: collapse a burst into one invocation, either on the
//!   leading edge (`immediate`) or `wait` after the last call.
//! - [`Throttle`]: invoke at most once per `limit` window, leading edge only.
//!
//! # Design
//!
//! Nothing here reads a clock or spawns a timer. Every call takes `now` (a
//! monotonic offset supplied by the host), and a pending trailing invocation
//! is a single deadline field that [`Debounce::poll`] checks. A new call
//! replaces the deadline, so two timers for the same wrapper never coexist.
//!
//! The timing state is split from the callback ([`DebounceTimer`],
//! [`ThrottleWindow`]) so a controller can gate one of its own methods
//! without handing out a closure that borrows it.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use terrasite_core::rate_limit::Throttle;
//!
//! let mut hits = 0;
//! let mut throttled = Throttle::new(|_: ()| hits += 1, Duration::from_millis(100));
//! assert!(throttled.call(Duration::ZERO, ()));
//! assert!(!throttled.call(Duration::from_millis(50), ()));
//! assert!(throttled.call(Duration::from_millis(100), ()));
//! drop(throttled);
//! assert_eq!(hits, 2);
//! ```

use std::time::Duration;

/// Default debounce quiet period.
pub const DEFAULT_DEBOUNCE_WAIT: Duration = Duration::from_millis(20);

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// What a [`DebounceTimer`] decided for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceDecision {
    /// Invoke now (leading edge).
    InvokeNow,
    /// Suppressed; a trailing invocation is armed for the deadline.
    Deferred,
    /// Suppressed with nothing armed (leading mode inside the quiet period).
    Suppressed,
}

/// Timing state of a debounced callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimer {
    wait: Duration,
    immediate: bool,
    deadline: Option<Duration>,
}

impl DebounceTimer {
    /// Create a timer with the given quiet period and edge mode.
    #[must_use]
    pub const fn new(wait: Duration, immediate: bool) -> Self {
        Self {
            wait,
            immediate,
            deadline: None,
        }
    }

    /// Register a call at `now`.
    ///
    /// Any call restarts the quiet period. Callers should [`expire`](Self::expire)
    /// first so a stale deadline is not mistaken for an active one.
    pub fn register(&mut self, now: Duration) -> DebounceDecision {
        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now.saturating_add(self.wait));
        if call_now {
            DebounceDecision::InvokeNow
        } else if self.immediate {
            DebounceDecision::Suppressed
        } else {
            DebounceDecision::Deferred
        }
    }

    /// Clear the deadline if it has passed.
    ///
    /// Returns `true` when a deadline expired at or before `now`.
    pub fn expire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any armed deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// The armed deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether the quiet period is running.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Leading-edge mode.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        self.immediate
    }
}

/// Debounced callback.
///
/// With `immediate`, the first call of a quiet period runs the callback
/// synchronously and later calls within `wait` are swallowed (each one
/// pushing the quiet period out). Without it, the callback runs once,
/// `wait` after the last call of a burst, with that call's arguments; the
/// host must call [`poll`](Self::poll) for the trailing edge to fire.
pub struct Debounce<F, A> {
    callback: F,
    timer: DebounceTimer,
    pending_args: Option<A>,
}

impl<F, A> Debounce<F, A>
where
    F: FnMut(A),
{
    /// Wrap `callback`.
    pub fn new(callback: F, wait: Duration, immediate: bool) -> Self {
        Self {
            callback,
            timer: DebounceTimer::new(wait, immediate),
            pending_args: None,
        }
    }

    /// Wrap `callback` with a 20ms leading-edge quiet period.
    pub fn with_defaults(callback: F) -> Self {
        Self::new(callback, DEFAULT_DEBOUNCE_WAIT, true)
    }

    /// Invoke the wrapper at `now`.
    ///
    /// Returns `true` if the callback ran synchronously.
    pub fn call(&mut self, now: Duration, args: A) -> bool {
        self.poll(now);
        match self.timer.register(now) {
            DebounceDecision::InvokeNow => {
                (self.callback)(args);
                true
            }
            DebounceDecision::Deferred => {
                self.pending_args = Some(args);
                false
            }
            DebounceDecision::Suppressed => false,
        }
    }

    /// Fire the trailing edge if its deadline has passed.
    ///
    /// Returns `true` if the callback ran.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.timer.expire(now) {
            return false;
        }
        match self.pending_args.take() {
            Some(args) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }

    /// Drop the pending trailing call without running it.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.pending_args = None;
    }

    /// Deadline of the current quiet period.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Whether a quiet period is running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

impl<F, A> std::fmt::Debug for Debounce<F, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounce")
            .field("timer", &self.timer)
            .field("has_pending_args", &self.pending_args.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Timing state of a throttled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleWindow {
    limit: Duration,
    window_end: Option<Duration>,
}

impl ThrottleWindow {
    /// Create a window gate with the given length.
    #[must_use]
    pub const fn new(limit: Duration) -> Self {
        Self {
            limit,
            window_end: None,
        }
    }

    /// Try to open a window at `now`.
    ///
    /// Returns `true` (and starts a new window) when no window is open. A call
    /// landing exactly on the previous window's end opens the next one.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if let Some(end) = self.window_end
            && now < end
        {
            return false;
        }
        self.window_end = Some(now.saturating_add(self.limit));
        true
    }

    /// Close the current window early.
    pub fn reset(&mut self) {
        self.window_end = None;
    }

    /// End of the open window, if one was ever opened.
    #[must_use]
    pub const fn window_end(&self) -> Option<Duration> {
        self.window_end
    }

    /// Window length.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }
}

/// Throttled callback: leading edge only, later calls in the window dropped.
pub struct Throttle<F> {
    callback: F,
    window: ThrottleWindow,
}

impl<F> Throttle<F> {
    /// Wrap `callback` with a window of `limit`.
    pub fn new(callback: F, limit: Duration) -> Self {
        Self {
            callback,
            window: ThrottleWindow::new(limit),
        }
    }

    /// Invoke the wrapper at `now`.
    ///
    /// Returns `true` if the callback ran.
    pub fn call<A>(&mut self, now: Duration, args: A) -> bool
    where
        F: FnMut(A),
    {
        if !self.window.try_acquire(now) {
            return false;
        }
        (self.callback)(args);
        true
    }

    /// Timing state.
    #[must_use]
    pub fn window(&self) -> &ThrottleWindow {
        &self.window
    }
}

impl<F> std::fmt::Debug for Throttle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn debounce_immediate_fires_once_on_leading_call() {
        let calls = RefCell::new(Vec::new());
        let mut debounced = Debounce::new(|n: u32| calls.borrow_mut().push(n), ms(20), true);

        // Five calls inside 10ms.
        let fired: Vec<bool> = (0..5u32)
            .map(|i| debounced.call(ms(u64::from(i) * 2), i))
            .collect();

        assert_eq!(fired, vec![true, false, false, false, false]);
        drop(debounced);
        assert_eq!(*calls.borrow(), vec![0]);
    }

    #[test]
    fn debounce_immediate_never_fires_trailing_edge() {
        let mut count = 0;
        let mut debounced = Debounce::new(|_: ()| count += 1, ms(20), true);
        debounced.call(ms(0), ());
        debounced.call(ms(5), ());
        assert!(!debounced.poll(ms(100)));
        drop(debounced);
        assert_eq!(count, 1);
    }

    #[test]
    fn debounce_immediate_rearms_after_quiet_period() {
        let mut count = 0;
        let mut debounced = Debounce::new(|_: ()| count += 1, ms(20), true);
        assert!(debounced.call(ms(0), ()));
        assert!(!debounced.call(ms(15), ()));
        // Quiet period was pushed to 35ms by the second call.
        assert!(!debounced.call(ms(30), ()));
        assert!(debounced.call(ms(60), ()));
        drop(debounced);
        assert_eq!(count, 2);
    }

    #[test]
    fn debounce_trailing_fires_after_last_call_with_last_args() {
        let calls = RefCell::new(Vec::new());
        let mut debounced = Debounce::new(|n: u32| calls.borrow_mut().push(n), ms(20), false);

        assert!(!debounced.call(ms(0), 1));
        assert!(!debounced.call(ms(10), 2));
        assert!(!debounced.call(ms(25), 3));

        assert!(!debounced.poll(ms(44)));
        assert!(debounced.poll(ms(45)));
        assert!(!debounced.poll(ms(100)));

        drop(debounced);
        assert_eq!(*calls.borrow(), vec![3]);
    }

    #[test]
    fn debounce_trailing_flushes_stale_deadline_on_next_call() {
        let calls = RefCell::new(Vec::new());
        let mut debounced = Debounce::new(|n: u32| calls.borrow_mut().push(n), ms(20), false);
        debounced.call(ms(0), 1);
        // Host never polled; the next burst starts long after the deadline.
        debounced.call(ms(500), 2);
        assert!(debounced.poll(ms(520)));
        drop(debounced);
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn debounce_cancel_drops_pending_call() {
        let mut count = 0;
        let mut debounced = Debounce::new(|_: ()| count += 1, ms(20), false);
        debounced.call(ms(0), ());
        assert!(debounced.is_pending());
        debounced.cancel();
        assert!(!debounced.is_pending());
        assert!(!debounced.poll(ms(50)));
        drop(debounced);
        assert_eq!(count, 0);
    }

    #[test]
    fn debounce_defaults_are_leading_edge_20ms() {
        let mut debounced = Debounce::with_defaults(|_: ()| {});
        debounced.call(ms(0), ());
        assert_eq!(debounced.deadline(), Some(ms(20)));
    }

    #[test]
    fn throttle_every_10ms_for_250ms_fires_three_times() {
        let calls = RefCell::new(Vec::new());
        let mut throttled = Throttle::new(|t: u64| calls.borrow_mut().push(t), ms(100));

        for t in (0..250).step_by(10) {
            throttled.call(ms(t), t);
        }

        drop(throttled);
        assert_eq!(*calls.borrow(), vec![0, 100, 200]);
    }

    #[test]
    fn throttle_drops_calls_inside_window() {
        let mut window = ThrottleWindow::new(ms(100));
        assert!(window.try_acquire(ms(5)));
        assert!(!window.try_acquire(ms(104)));
        assert!(window.try_acquire(ms(105)));
        assert_eq!(window.window_end(), Some(ms(205)));
    }

    #[test]
    fn throttle_reset_reopens_immediately() {
        let mut window = ThrottleWindow::new(ms(100));
        assert!(window.try_acquire(ms(0)));
        window.reset();
        assert!(window.try_acquire(ms(1)));
    }

    #[test]
    fn timer_reports_suppressed_in_leading_mode() {
        let mut timer = DebounceTimer::new(ms(20), true);
        assert_eq!(timer.register(ms(0)), DebounceDecision::InvokeNow);
        assert_eq!(timer.register(ms(1)), DebounceDecision::Suppressed);
        assert!(timer.expire(ms(21)));
        assert!(!timer.is_pending());
    }
}
