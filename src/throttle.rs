use std::time::Duration;
use tracing::{trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::metrics::{THROTTLE_FIRED, THROTTLE_SUPPRESSED};

pub(crate) fn duration_to_millis(wait: Duration) -> i64 {
    i64::try_from(wait.as_millis()).unwrap_or(i64::MAX)
}

pub(crate) fn millis_to_duration(wait_ms: i64) -> Result<Duration> {
    if wait_ms < 0 {
        return Err(Error::NegativeWait(wait_ms));
    }
    Ok(Duration::from_millis(wait_ms as u64))
}

/// Leading-edge throttle gate.
///
/// Holds the time of the last fire and lets a call through only once `wait`
/// has passed since then. The window starts at construction, so a call made
/// right after `new` is dropped unless `wait` is zero. Dropped calls are not
/// queued or replayed later.
#[derive(Debug, Clone)]
pub struct Throttle<C = SystemClock> {
    wait: Duration,
    wait_ms: i64,
    last_fire: i64,
    clock: C,
}

impl Throttle<SystemClock> {
    pub fn new(wait: Duration) -> Self {
        Self::with_clock(wait, SystemClock)
    }

    // Negative waits are rejected rather than clamped to zero
    pub fn from_millis(wait_ms: i64) -> Result<Self> {
        Ok(Self::new(millis_to_duration(wait_ms)?))
    }
}

impl<C: Clock> Throttle<C> {
    pub fn with_clock(wait: Duration, clock: C) -> Self {
        let last_fire = clock.now_millis();
        Self {
            wait,
            wait_ms: duration_to_millis(wait),
            last_fire,
            clock,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn last_fire_millis(&self) -> i64 {
        self.last_fire
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Checks the window and, if it has elapsed, claims it.
    ///
    /// Returns `true` when the caller should run its action. The new window is
    /// measured from the clock reading taken here, before the action runs.
    pub fn attempt(&mut self) -> bool {
        let now = self.clock.now_millis();
        let elapsed = now.saturating_sub(self.last_fire);

        if elapsed < 0 {
            // clock stepped backwards; keep last_fire so it never decreases
            warn!(now, last_fire = self.last_fire, "clock went backwards, dropping call");
            THROTTLE_SUPPRESSED.inc();
            return false;
        }

        if elapsed >= self.wait_ms {
            self.last_fire = now;
            THROTTLE_FIRED.inc();
            trace!(elapsed, wait_ms = self.wait_ms, "throttle fired");
            true
        } else {
            THROTTLE_SUPPRESSED.inc();
            trace!(elapsed, wait_ms = self.wait_ms, "throttle suppressed");
            false
        }
    }

    /// Runs `f` if the window allows it and hands back its result.
    ///
    /// Panics from `f` are not caught; the window counts as used.
    pub fn call<R, F: FnOnce() -> R>(&mut self, f: F) -> Option<R> {
        if self.attempt() { Some(f()) } else { None }
    }

    // Time left before the next call may fire
    pub fn remaining(&self) -> Duration {
        let elapsed = self.clock.now_millis().saturating_sub(self.last_fire);
        let left = self.wait_ms.saturating_sub(elapsed).max(0);
        Duration::from_millis(left as u64)
    }
}

// A throttle bundled with the action it guards
pub struct Throttled<F, C = SystemClock> {
    throttle: Throttle<C>,
    action: F,
}

impl<F, C> Throttled<F, C>
where
    F: FnMut(),
    C: Clock,
{
    // Returns whether the action ran
    pub fn invoke(&mut self) -> bool {
        self.throttle.call(&mut self.action).is_some()
    }

    pub fn throttle(&self) -> &Throttle<C> {
        &self.throttle
    }

    // Plain callable form, for callers that just want `FnMut()`
    pub fn into_fn(mut self) -> impl FnMut() {
        move || {
            self.invoke();
        }
    }
}

/// Wraps `action` so it runs at most once per `wait`, measured on the system clock.
pub fn wrap<F: FnMut()>(action: F, wait: Duration) -> Throttled<F> {
    wrap_with_clock(action, wait, SystemClock)
}

pub fn wrap_with_clock<F: FnMut(), C: Clock>(action: F, wait: Duration, clock: C) -> Throttled<F, C> {
    Throttled {
        throttle: Throttle::with_clock(wait, clock),
        action,
    }
}
