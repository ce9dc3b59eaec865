//! Property-based invariant tests for the rate limiters.
//!
//! ## Invariants
//!
//! 1. Throttle: consecutive invocations are at least `limit` apart.
//! 2. Throttle: the first call always fires.
//! 3. Throttle: a call that arrives `limit` after the last firing fires.
//! 4. Debounce (leading): fires exactly when the gap since the previous call
//!    is at least `wait` (or on the very first call).
//! 5. Debounce (trailing): never fires synchronously; one poll after the
//!    last call's deadline fires exactly once with the last argument.

use std::cell::RefCell;
use std::time::Duration;

use proptest::prelude::*;
use terrasite_core::rate_limit::{Debounce, Throttle};

// ── Strategies ────────────────────────────────────────────────────────────

/// Monotonic call times in milliseconds built from gaps.
fn arb_call_times(max_n: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..60, 1..max_n).prop_map(|gaps| {
        let mut t = 0;
        gaps.into_iter()
            .map(|gap| {
                t += gap;
                t
            })
            .collect()
    })
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ── 1–3. Throttle ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn throttle_firings_are_spaced_by_limit(times in arb_call_times(80), limit in 1u64..200) {
        let fired = RefCell::new(Vec::new());
        let mut throttled = Throttle::new(|t: u64| fired.borrow_mut().push(t), ms(limit));
        for &t in &times {
            throttled.call(ms(t), t);
        }
        drop(throttled);
        let fired = fired.into_inner();

        prop_assert_eq!(fired.first().copied(), times.first().copied());
        for pair in fired.windows(2) {
            prop_assert!(pair[1] - pair[0] >= limit);
        }
    }

    #[test]
    fn throttle_never_starves_a_late_call(times in arb_call_times(40), limit in 1u64..200) {
        let mut last_fire: Option<u64> = None;
        let mut throttled = Throttle::new(|_: ()| {}, ms(limit));
        for &t in &times {
            let expected = last_fire.is_none_or(|last| t >= last + limit);
            let fired = throttled.call(ms(t), ());
            prop_assert_eq!(fired, expected);
            if fired {
                last_fire = Some(t);
            }
        }
    }
}

// ── 4–5. Debounce ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn leading_debounce_fires_on_quiet_gaps(times in arb_call_times(60), wait in 1u64..80) {
        let mut debounced = Debounce::new(|_: ()| {}, ms(wait), true);
        let mut previous: Option<u64> = None;
        for &t in &times {
            let expected = previous.is_none_or(|p| t >= p + wait);
            prop_assert_eq!(debounced.call(ms(t), ()), expected);
            previous = Some(t);
        }
    }

    #[test]
    fn trailing_debounce_fires_once_with_last_args(times in arb_call_times(60), wait in 61u64..120) {
        // Gaps are < 60ms and wait > 60ms, so the whole sequence is one burst.
        let fired = RefCell::new(Vec::new());
        let mut debounced = Debounce::new(|t: u64| fired.borrow_mut().push(t), ms(wait), false);
        for &t in &times {
            prop_assert!(!debounced.call(ms(t), t));
        }
        let last = *times.last().unwrap();
        prop_assert!(!debounced.poll(ms(last + wait - 1)));
        prop_assert!(debounced.poll(ms(last + wait)));
        drop(debounced);
        prop_assert_eq!(fired.into_inner(), vec![last]);
    }
}
