use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Default)]
pub struct TimeOfDay(u16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct TimeParseError(pub String);

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<TimeOfDay> {
        (hour < 24 && minute < 60).then(|| TimeOfDay(hour * 60 + minute))
    }

    pub fn from_minutes(minutes: u64) -> TimeOfDay {
        TimeOfDay((minutes % MINUTES_PER_DAY as u64) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Shifts by a (possibly fractional) number of hours, wrapping past midnight.
    /// Non-finite or non-positive shifts leave the time unchanged.
    pub fn add_hours(self, hours: f64) -> TimeOfDay {
        if !hours.is_finite() || hours <= 0.0 {
            return self;
        }
        let shift = (hours * 60.0).round().rem_euclid(MINUTES_PER_DAY as f64) as u64;
        self + shift
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeParseError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if h.is_empty() || h.len() > 2 || m.len() != 2 || !digits(h) || !digits(m) {
            return Err(err());
        }
        let hour = h.parse::<u16>().map_err(|_| err())?;
        let minute = m.parse::<u16>().map_err(|_| err())?;
        TimeOfDay::new(hour, minute).ok_or_else(err)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Add<u64> for TimeOfDay {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        TimeOfDay::from_minutes(self.0 as u64 + rhs % MINUTES_PER_DAY as u64)
    }
}

/// Minutes elapsed from `rhs` to `self`, assuming `self` is no more than a day later.
impl Sub<TimeOfDay> for TimeOfDay {
    type Output = u16;

    fn sub(self, rhs: TimeOfDay) -> Self::Output {
        (self.0 + MINUTES_PER_DAY - rhs.0) % MINUTES_PER_DAY
    }
}
