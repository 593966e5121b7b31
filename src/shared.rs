use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::metrics::{THROTTLE_FIRED, THROTTLE_SUPPRESSED};
use crate::throttle::{duration_to_millis, millis_to_duration};

/// Throttle that can be shared between threads (behind an `Arc`).
///
/// Same gating rules as [`Throttle`](crate::Throttle), but the check and the
/// timestamp update happen as one compare-exchange, so when several threads
/// race for the same window exactly one of them wins.
#[derive(Debug)]
pub struct SharedThrottle<C = SystemClock> {
    wait: Duration,
    wait_ms: i64,
    last_fire: AtomicI64,
    clock: C,
}

impl SharedThrottle<SystemClock> {
    pub fn new(wait: Duration) -> Self {
        Self::with_clock(wait, SystemClock)
    }

    pub fn from_millis(wait_ms: i64) -> Result<Self> {
        Ok(Self::new(millis_to_duration(wait_ms)?))
    }
}

impl<C: Clock> SharedThrottle<C> {
    pub fn with_clock(wait: Duration, clock: C) -> Self {
        let now = clock.now_millis();
        Self {
            wait,
            wait_ms: duration_to_millis(wait),
            last_fire: AtomicI64::new(now),
            clock,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn last_fire_millis(&self) -> i64 {
        self.last_fire.load(Ordering::Acquire)
    }

    pub fn attempt(&self) -> bool {
        let mut last = self.last_fire.load(Ordering::Acquire);
        loop {
            let now = self.clock.now_millis();
            let elapsed = now.saturating_sub(last);

            // negative elapsed means the clock went backwards, treat as inside the window
            if elapsed < 0 || elapsed < self.wait_ms {
                THROTTLE_SUPPRESSED.inc();
                return false;
            }

            match self
                .last_fire
                .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    THROTTLE_FIRED.inc();
                    trace!(elapsed, wait_ms = self.wait_ms, "shared throttle fired");
                    return true;
                }
                // someone else moved last_fire, re-check against their value
                Err(current) => last = current,
            }
        }
    }

    pub fn call<R, F: FnOnce() -> R>(&self, f: F) -> Option<R> {
        if self.attempt() { Some(f()) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn one_winner_per_window() {
        let clock = ManualClock::new(0);
        let throttle = Arc::new(SharedThrottle::with_clock(Duration::from_millis(100), clock.clone()));
        clock.advance(100);

        let fired = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let throttle = Arc::clone(&throttle);
                let fired = Arc::clone(&fired);
                thread::spawn(move || {
                    for _ in 0..100 {
                        if throttle.attempt() {
                            fired.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert_eq!(throttle.last_fire_millis(), 100);
    }

    #[test]
    fn gating_matches_single_owner_throttle() {
        let clock = ManualClock::new(0);
        let throttle = SharedThrottle::with_clock(Duration::from_millis(20), clock.clone());

        assert!(!throttle.attempt());
        clock.advance(20);
        assert_eq!(throttle.call(|| "ran"), Some("ran"));
        clock.advance(19);
        assert!(!throttle.attempt());
        clock.advance(1);
        assert!(throttle.attempt());
    }
}
