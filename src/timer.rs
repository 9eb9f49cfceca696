//! Cooldown timers.
//!
//! A [`CooldownTimer`] gates how often a special behavior may trigger. It comes
//! in two flavours:
//!
//! - *single-fire*: [`CooldownTimer::is_elapsed`] only reports; whoever consumes
//!   the timer sets the next expiry explicitly.
//! - *recurring*: [`CooldownTimer::fire`] reports and, when it fires, pushes the
//!   expiry forward by the configured interval.
//!
//! Every method has an `_at` variant taking the current instant so that tests can
//! drive the timer without sleeping.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

/// A time gate whose expiry only ever moves forward.
#[derive(Debug, Clone)]
pub struct CooldownTimer {
    expires_at: Instant,
    recur_interval: Option<Duration>,
}

impl CooldownTimer {
    /// Create a single-fire timer that elapses `initial` from now.
    ///
    /// `Duration::ZERO` gives a timer that is usable immediately.
    pub fn single(initial: Duration) -> Self {
        Self::single_at(initial, Instant::now())
    }

    pub fn single_at(initial: Duration, now: Instant) -> Self {
        Self {
            expires_at: now + initial,
            recur_interval: None,
        }
    }

    /// Create a recurring timer with the given interval.
    ///
    /// The timer starts out elapsed, so the first [`fire`](Self::fire) succeeds.
    pub fn recurring(interval: Duration) -> Self {
        Self::recurring_at(interval, Instant::now())
    }

    pub fn recurring_at(interval: Duration, now: Instant) -> Self {
        Self {
            expires_at: now,
            recur_interval: Some(interval),
        }
    }

    /// Current expiry instant.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Configured recurrence, `None` for single-fire timers.
    pub fn recur_interval(&self) -> Option<Duration> {
        self.recur_interval
    }

    /// Whether the expiry has been reached. Never mutates the timer.
    pub fn is_elapsed(&self) -> bool {
        self.is_elapsed_at(Instant::now())
    }

    pub fn is_elapsed_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time left until the timer elapses, zero if it already has.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Move the expiry to `duration` from now.
    pub fn set_expiry_in(&mut self, duration: Duration) {
        self.set_expiry_in_at(duration, Instant::now());
    }

    pub fn set_expiry_in_at(&mut self, duration: Duration, now: Instant) {
        let candidate = now + duration;
        if candidate > self.expires_at {
            self.expires_at = candidate;
        }
    }

    /// Move the expiry to a whole number of seconds drawn uniformly from `range_secs`.
    ///
    /// Returns the drawn duration.
    pub fn set_random_expiry_in<R: Rng + ?Sized>(
        &mut self,
        range_secs: RangeInclusive<u64>,
        rng: &mut R,
    ) -> Duration {
        self.set_random_expiry_in_at(range_secs, rng, Instant::now())
    }

    pub fn set_random_expiry_in_at<R: Rng + ?Sized>(
        &mut self,
        range_secs: RangeInclusive<u64>,
        rng: &mut R,
        now: Instant,
    ) -> Duration {
        let duration = Duration::from_secs(rng.random_range(range_secs));
        self.set_expiry_in_at(duration, now);
        duration
    }

    /// Recurring check: returns true when elapsed and re-arms the timer for
    /// another interval measured from this moment.
    ///
    /// On a single-fire timer this behaves like [`is_elapsed`](Self::is_elapsed).
    pub fn fire(&mut self) -> bool {
        self.fire_at(Instant::now())
    }

    pub fn fire_at(&mut self, now: Instant) -> bool {
        if !self.is_elapsed_at(now) {
            return false;
        }
        if let Some(interval) = self.recur_interval {
            self.set_expiry_in_at(interval, now);
        }
        true
    }
}
