use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::throttle::{Throttle, millis_to_duration};

// Throttle settings as they come from a config file
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    // Minimum gap between two fires, in milliseconds
    #[serde(default = "default_wait_ms")]
    pub wait_ms: i64,
}

fn default_wait_ms() -> i64 {
    1_000
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
        }
    }
}

impl ThrottleConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ThrottleConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wait_ms < 0 {
            return Err(Error::NegativeWait(self.wait_ms));
        }
        Ok(())
    }

    pub fn wait(&self) -> Result<Duration> {
        millis_to_duration(self.wait_ms)
    }

    pub fn build(&self) -> Result<Throttle> {
        Ok(Throttle::new(self.wait()?))
    }
}
