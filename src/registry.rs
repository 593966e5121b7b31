use dashmap::DashMap;
use std::time::Duration;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::ThrottleConfig;
use crate::error::Result;
use crate::metrics::{THROTTLE_FIRED, THROTTLE_SUPPRESSED};
use crate::throttle::duration_to_millis;

// Keyed throttles - one independent window per key (client id, event name, ...)
pub struct ThrottleRegistry<C = SystemClock> {
    entries: DashMap<String, i64>, // key -> last fire millis
    wait: Duration,
    wait_ms: i64,
    clock: C,
}

impl ThrottleRegistry<SystemClock> {
    pub fn new(wait: Duration) -> Self {
        Self::with_clock(wait, SystemClock)
    }

    pub fn from_config(config: &ThrottleConfig) -> Result<Self> {
        Ok(Self::new(config.wait()?))
    }
}

impl<C: Clock> ThrottleRegistry<C> {
    pub fn with_clock(wait: Duration, clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            wait,
            wait_ms: duration_to_millis(wait),
            clock,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    // A key's window opens the first time it is seen, so that first call is dropped
    // unless the wait is zero.
    pub fn attempt(&self, key: &str) -> bool {
        let now = self.clock.now_millis();

        let mut last_fire = self.entries.entry(key.to_string()).or_insert_with(|| {
            debug!(key, "tracking new throttle key");
            now
        });

        let elapsed = now.saturating_sub(*last_fire);
        if elapsed >= 0 && elapsed >= self.wait_ms {
            *last_fire = now;
            THROTTLE_FIRED.inc();
            trace!(key, elapsed, "keyed throttle fired");
            return true;
        }

        THROTTLE_SUPPRESSED.inc();
        false
    }

    pub fn call<R, F: FnOnce() -> R>(&self, key: &str, f: F) -> Option<R> {
        if self.attempt(key) { Some(f()) } else { None }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // Drop keys whose window has elapsed. A purged key starts a fresh window when seen again.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.entries.len();
        self.entries
            .retain(|_, last_fire| now.saturating_sub(*last_fire) < self.wait_ms);
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "purged expired throttle keys");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
