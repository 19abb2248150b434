//! Wall-clock alarm time parsed from `H:MM` or `HH:MM`.

use std::fmt;
use std::str::FromStr;

use crate::error::TimeParseError;

/// Hour and minute of the day the alarm should fire at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::Hour);
        }
        if minute > 59 {
            return Err(TimeParseError::Minute);
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for AlarmTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(':') || !(4..=5).contains(&s.len()) {
            return Err(TimeParseError::Format);
        }

        let (hour_str, minute_str) = s.split_once(':').ok_or(TimeParseError::Format)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&hour_str.len())
            || minute_str.len() != 2
            || !digits(hour_str)
            || !digits(minute_str)
        {
            return Err(TimeParseError::Format);
        }

        let hour: u8 = hour_str.parse().map_err(|_| TimeParseError::Hour)?;
        let minute: u8 = minute_str.parse().map_err(|_| TimeParseError::Minute)?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
