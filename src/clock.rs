use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Half of the day a 12-hour time falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn toggled(self) -> Period {
        match self {
            Period::Am => Period::Pm,
            Period::Pm => Period::Am,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Am => f.write_str("AM"),
            Period::Pm => f.write_str("PM"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFormatError {
    #[error("Invalid time '{0}'. Use HH:MM (24-hour) or h:MM AM/PM.")]
    Malformed(String),

    #[error("Hour {0} is out of range")]
    HourOutOfRange(u8),

    #[error("Minute {0} is out of range (0-59)")]
    MinuteOutOfRange(u8),
}

/// A time of day as picked on a 12-hour clock face.
///
/// `hour12` is always in `1..=12` and `minute` in `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    hour12: u8,
    minute: u8,
    period: Period,
}

impl ClockTime {
    pub fn new(hour12: u8, minute: u8, period: Period) -> Result<Self, TimeFormatError> {
        if !(1..=12).contains(&hour12) {
            return Err(TimeFormatError::HourOutOfRange(hour12));
        }
        if minute > 59 {
            return Err(TimeFormatError::MinuteOutOfRange(minute));
        }
        Ok(ClockTime { hour12, minute, period })
    }

    /// 12:00 AM, the picker's starting position.
    pub fn midnight() -> Self {
        ClockTime { hour12: 12, minute: 0, period: Period::Am }
    }

    pub fn hour12(&self) -> u8 {
        self.hour12
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn with_hour12(self, hour12: u8) -> Result<Self, TimeFormatError> {
        ClockTime::new(hour12, self.minute, self.period)
    }

    pub fn with_minute(self, minute: u8) -> Result<Self, TimeFormatError> {
        ClockTime::new(self.hour12, minute, self.period)
    }

    pub fn with_period(self, period: Period) -> Self {
        ClockTime { period, ..self }
    }

    /// Hour on the 24-hour clock (`0..=23`).
    pub fn hour24(&self) -> u8 {
        match (self.period, self.hour12) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        }
    }

    /// Builds the 12-hour form of a 24-hour clock reading.
    pub fn from_hour24(hour: u8, minute: u8) -> Result<Self, TimeFormatError> {
        let (hour12, period) = match hour {
            0 => (12, Period::Am),
            1..=11 => (hour, Period::Am),
            12 => (12, Period::Pm),
            13..=23 => (hour - 12, Period::Pm),
            _ => return Err(TimeFormatError::HourOutOfRange(hour)),
        };
        ClockTime::new(hour12, minute, period)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Fields are range-checked on construction.
        NaiveTime::from_hms_opt(u32::from(self.hour24()), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        // NaiveTime hours and minutes are always in range.
        ClockTime::from_hour24(time.hour() as u8, time.minute() as u8)
            .unwrap_or_else(|_| ClockTime::midnight())
    }
}

/// Displays the 12-hour reading, e.g. `3:05 PM`.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour12, self.minute, self.period)
    }
}

/// Parses 12-hour text such as `3:05 PM`, `3:05pm` or `12:00 am`.
impl FromStr for ClockTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeFormatError::Malformed(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let (clock, period) = if let Some(rest) = lower.strip_suffix("am") {
            (rest.trim_end(), Period::Am)
        } else if let Some(rest) = lower.strip_suffix("pm") {
            (rest.trim_end(), Period::Pm)
        } else {
            return Err(malformed());
        };
        let (h, m) = clock.split_once(':').ok_or_else(malformed)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(malformed());
        }
        let hour12 = parse_digits(h).ok_or_else(malformed)?;
        let minute = parse_digits(m).ok_or_else(malformed)?;
        ClockTime::new(hour12, minute, period)
    }
}

/// Decodes a canonical `HH:MM` 24-hour string.
///
/// Empty input means "no time set" and yields `Ok(None)`.
pub fn decode(input: &str) -> Result<Option<ClockTime>, TimeFormatError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let malformed = || TimeFormatError::Malformed(input.to_string());
    let (h, m) = trimmed.split_once(':').ok_or_else(malformed)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(malformed());
    }
    let hour = parse_digits(h).ok_or_else(malformed)?;
    let minute = parse_digits(m).ok_or_else(malformed)?;
    if hour > 23 {
        return Err(TimeFormatError::HourOutOfRange(hour));
    }
    ClockTime::from_hour24(hour, minute).map(Some)
}

/// Encodes a 12-hour selection as a canonical `HH:MM` string.
pub fn encode(time: &ClockTime) -> String {
    format!("{:02}:{:02}", time.hour24(), time.minute)
}

/// Reads a time the user typed in either 24-hour or 12-hour form.
pub fn parse_user_time(input: &str) -> Result<Option<ClockTime>, TimeFormatError> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with("am") || lower.ends_with("pm") {
        return trimmed.parse().map(Some);
    }
    decode(trimmed)
}

fn parse_digits(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
