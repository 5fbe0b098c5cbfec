// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate limiting for bursty events.
//!
//! [`Throttle`] is a plain state machine with no timer of its own. The owner
//! asks for the current [`deadline`][Throttle::deadline], sleeps until then
//! and calls [`fire`][Throttle::fire]. That keeps the timing logic testable
//! without a runtime and lets [`Balancer::run`] drive it from its event loop.
//!
//! [`Balancer::run`]: crate::actor::balancer::Balancer::run

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Which arguments a trailing call is made with when several calls land
/// inside one window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailingArgs {
    /// Use the arguments of the most recent call.
    #[default]
    Latest,
    /// Use the arguments of the call that opened the window.
    First,
}

#[derive(Debug)]
struct Pending<A> {
    deadline: Instant,
    args: A,
}

/// Coalesces calls so the handler runs at most once per `delay`, always
/// after the delay has elapsed.
#[derive(Debug)]
pub struct Throttle<A> {
    delay: Duration,
    trailing: TrailingArgs,
    pending: Option<Pending<A>>,
}

impl<A> Throttle<A> {
    pub fn new(delay: Duration, trailing: TrailingArgs) -> Self {
        Throttle { delay, trailing, pending: None }
    }

    /// Records a call.
    ///
    /// Returns the deadline of a newly scheduled call, or `None` if a call
    /// was already pending. A pending call is never rescheduled.
    pub fn call(&mut self, now: Instant, args: A) -> Option<Instant> {
        if let Some(pending) = &mut self.pending {
            if self.trailing == TrailingArgs::Latest {
                pending.args = args;
            }
            return None;
        }
        let deadline = now + self.delay;
        self.pending = Some(Pending { deadline, args });
        Some(deadline)
    }

    /// Takes the pending call if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<A> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            self.pending.take().map(|p| p.args)
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_call_schedules_a_delayed_fire() {
        let start = Instant::now();
        let mut throttle = Throttle::new(DELAY, TrailingArgs::Latest);
        assert_eq!(throttle.call(start, 1), Some(start + DELAY));
        assert_eq!(throttle.fire(start + ms(100)), None);
        assert_eq!(throttle.fire(start + DELAY), Some(1));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn burst_coalesces_into_one_fire() {
        let start = Instant::now();
        let mut throttle = Throttle::new(DELAY, TrailingArgs::Latest);
        assert!(throttle.call(start, 1).is_some());
        assert_eq!(throttle.call(start + ms(10), 2), None);
        assert_eq!(throttle.call(start + ms(240), 3), None);
        assert_eq!(throttle.deadline(), Some(start + DELAY));
        assert_eq!(throttle.fire(start + DELAY), Some(3));
        assert_eq!(throttle.fire(start + DELAY + ms(1)), None);
    }

    #[test]
    fn first_policy_keeps_opening_arguments() {
        let start = Instant::now();
        let mut throttle = Throttle::new(DELAY, TrailingArgs::First);
        throttle.call(start, "open");
        throttle.call(start + ms(50), "later");
        assert_eq!(throttle.fire(start + DELAY), Some("open"));
    }

    #[test]
    fn fire_reopens_the_window() {
        let start = Instant::now();
        let mut throttle = Throttle::new(DELAY, TrailingArgs::Latest);
        throttle.call(start, 1);
        assert_eq!(throttle.fire(start + DELAY), Some(1));
        let later = start + ms(300);
        assert_eq!(throttle.call(later, 2), Some(later + DELAY));
        assert_eq!(throttle.fire(later + DELAY), Some(2));
    }

    #[test]
    fn fire_without_pending_call_is_a_no_op() {
        let mut throttle = Throttle::<()>::new(DELAY, TrailingArgs::Latest);
        assert_eq!(throttle.fire(Instant::now()), None);
        assert_eq!(throttle.deadline(), None);
    }
}
