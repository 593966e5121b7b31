//! User-agent sniffing.
//!
//! Classification is a case-sensitive substring check for the `Chrome`,
//! `Firefox` and `Safari` tokens, with Chrome taking priority. Chrome UAs carry
//! a `Safari/537.36` compatibility token, so Chrome must be checked before
//! Safari. The UA is never parsed structurally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::metrics::BROWSER_DETECTIONS;

const CHROME_TOKEN: &str = "Chrome";
const FIREFOX_TOKEN: &str = "Firefox";
const SAFARI_TOKEN: &str = "Safari";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Unknown,
}

impl Browser {
    pub const ALL: [Browser; 4] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Safari,
        Browser::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Safari => "safari",
            Browser::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown browser label: {0}")]
pub struct ParseBrowserError(pub String);

impl FromStr for Browser {
    type Err = ParseBrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Browser::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseBrowserError(s.to_string()))
    }
}

/// Classifies a user-agent string. Accepts any input; no match is `Unknown`.
pub fn detect(user_agent: &str) -> Browser {
    let is_chrome = user_agent.contains(CHROME_TOKEN);
    let is_firefox = user_agent.contains(FIREFOX_TOKEN);
    // Chrome UAs also advertise Safari
    let is_safari = user_agent.contains(SAFARI_TOKEN) && !is_chrome;

    if is_chrome {
        Browser::Chrome
    } else if is_firefox {
        Browser::Firefox
    } else if is_safari {
        Browser::Safari
    } else {
        Browser::Unknown
    }
}

// Same as `detect`, also counted in the detections metric
pub fn detect_recorded(user_agent: &str) -> Browser {
    let browser = detect(user_agent);
    BROWSER_DETECTIONS.with_label_values(&[browser.as_str()]).inc();
    browser
}
