//! Leading-edge call throttling and user-agent browser detection.

pub mod browser;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod shared;
pub mod throttle;

pub use browser::{Browser, detect, detect_recorded};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ThrottleConfig;
pub use error::{Error, Result};
pub use registry::ThrottleRegistry;
pub use shared::SharedThrottle;
pub use throttle::{Throttle, Throttled, wrap, wrap_with_clock};
