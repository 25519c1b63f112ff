//! Duration value object for scripted recordings

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default length of a scripted recording (5 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 5;

/// A positive recording length with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Saturates at `u64::MAX` milliseconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs.saturating_mul(1000),
        }
    }

    /// Default scripted recording length
    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Accepts "30s", "1m", "2m30s" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        let mut total_secs: u64 = 0;
        let mut digits = String::new();
        let mut seen_minutes = false;
        let mut seen_seconds = false;

        for ch in input.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                'm' if !digits.is_empty() && !seen_minutes && !seen_seconds => {
                    let minutes: u64 = digits.parse().map_err(|_| invalid())?;
                    total_secs = minutes
                        .checked_mul(60)
                        .and_then(|secs| total_secs.checked_add(secs))
                        .ok_or_else(invalid)?;
                    digits.clear();
                    seen_minutes = true;
                }
                's' if !digits.is_empty() && !seen_seconds => {
                    let seconds: u64 = digits.parse().map_err(|_| invalid())?;
                    total_secs = total_secs.checked_add(seconds).ok_or_else(invalid)?;
                    digits.clear();
                    seen_seconds = true;
                }
                _ => return Err(invalid()),
            }
        }

        // Trailing digits without a unit, or no unit at all
        if !digits.is_empty() || !(seen_minutes || seen_seconds) || total_secs == 0 {
            return Err(invalid());
        }

        // Must fit in milliseconds
        let milliseconds = total_secs.checked_mul(1000).ok_or_else(invalid)?;
        Ok(Self::from_millis(milliseconds))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.as_secs() / 60;
        let seconds = self.as_secs() % 60;

        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}
