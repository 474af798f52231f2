//! Wall-clock values within a single day, and durations between them.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

const MINUTES_PER_HOUR: u32 = 60;

/// An hours:minutes value.
///
/// Doubles as a duration: the difference of two clock values is itself a
/// clock value, clamped at zero. Ordering is chronological.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockValue {
    total_minutes: u32,
}

impl ClockValue {
    /// Midnight, or an empty duration.
    pub const ZERO: Self = Self { total_minutes: 0 };

    /// Creates a time of day, validating `0..=23` hours and `0..=59` minutes.
    pub const fn new(hours: u32, minutes: u32) -> Result<Self, ValidationError> {
        if hours > 23 || minutes > 59 {
            return Err(ValidationError::ClockOutOfRange { hours, minutes });
        }
        Ok(Self {
            total_minutes: hours * MINUTES_PER_HOUR + minutes,
        })
    }

    /// Builds a value from a minute count, clamping negatives to zero.
    pub fn from_minutes(minutes: i64) -> Self {
        let total_minutes = u32::try_from(minutes.max(0)).unwrap_or(u32::MAX);
        Self { total_minutes }
    }

    pub const fn total_minutes(self) -> u32 {
        self.total_minutes
    }

    pub const fn hours(self) -> u32 {
        self.total_minutes / MINUTES_PER_HOUR
    }

    pub const fn minutes(self) -> u32 {
        self.total_minutes % MINUTES_PER_HOUR
    }

    /// Duration from `earlier` to `self`, zero if `earlier` is later.
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> Self {
        Self {
            total_minutes: self.total_minutes.saturating_sub(earlier.total_minutes),
        }
    }

    /// Hours charged for a session of this length.
    ///
    /// Partial hours round up and every session costs at least one hour.
    pub const fn billed_hours(self) -> u32 {
        let hours = self.total_minutes.div_ceil(MINUTES_PER_HOUR);
        if hours == 0 { 1 } else { hours }
    }
}

impl Add for ClockValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total_minutes: self.total_minutes.saturating_add(rhs.total_minutes),
        }
    }
}

impl fmt::Display for ClockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockValue {
    type Err = ValidationError;

    /// Parses strict `HH:MM`: five characters, two-digit fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidClock {
            value: s.to_string(),
        };

        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(invalid());
        }

        let time = NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| invalid())?;
        Self::new(time.hour(), time.minute())
    }
}

impl Serialize for ClockValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
