// Clock values expressed as hours since midnight

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HubError;

/// Marker used in package data for "end of day" deadlines
pub const END_OF_DAY_MARKER: &str = "EOD";

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: i64 = 86_400;

/// A time of day as a 24-hour float, e.g. 10:30 AM is 10.5
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Clock(f64);

impl Clock {
    /// End of day, used for deadlines without a specific time
    pub const END_OF_DAY: Clock = Clock(24.0);

    /// Midnight
    pub const MIDNIGHT: Clock = Clock(0.0);

    /// Creates a clock value from hours since midnight
    pub fn from_hours(hours: f64) -> Self {
        Self(hours)
    }

    /// Hours since midnight
    pub fn hours(self) -> f64 {
        self.0
    }

    /// Parses "H:MM AM/PM", "H:MMAM", 24-hour "HH:MM" or the `EOD` marker,
    /// with an optional "+Nd" day offset as written by `Display`
    pub fn parse(input: &str) -> Result<Self, HubError> {
        let invalid = || HubError::InvalidClock {
            input: input.to_string(),
        };
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(END_OF_DAY_MARKER) {
            return Ok(Self::END_OF_DAY);
        }

        let (trimmed, days) = match trimmed.split_once('+') {
            Some((time, offset)) => {
                let days = offset
                    .trim()
                    .strip_suffix('d')
                    .and_then(|days| days.parse::<u32>().ok())
                    .ok_or_else(invalid)?;
                (time, days)
            }
            None => (trimmed, 0),
        };

        // chrono wants the meridiem glued to the minutes
        let compact: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        NaiveTime::parse_from_str(&compact, "%I:%M%p")
            .or_else(|_| NaiveTime::parse_from_str(&compact, "%H:%M"))
            .map(|time| Self::from_time(time).advance(f64::from(days) * 24.0))
            .map_err(|_| invalid())
    }

    /// Converts a chrono time of day
    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight() as f64 / SECONDS_PER_HOUR)
    }

    /// Converts to a chrono time of day. Past midnight this is the time on
    /// the following day; `days_after` says how many days on.
    pub fn to_time(self) -> NaiveTime {
        let seconds = self.total_seconds().rem_euclid(SECONDS_PER_DAY);
        NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Whole days past the starting day
    pub fn days_after(self) -> i64 {
        self.total_seconds().div_euclid(SECONDS_PER_DAY)
    }

    fn total_seconds(self) -> i64 {
        (self.0 * SECONDS_PER_HOUR).round() as i64
    }

    /// Returns this clock moved forward by the given number of hours
    pub fn advance(self, hours: f64) -> Self {
        Self(self.0 + hours)
    }

    /// The later of two clock values
    pub fn max(self, other: Clock) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    pub fn is_end_of_day(self) -> bool {
        self.0 == Self::END_OF_DAY.0
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_day() {
            return f.write_str(END_OF_DAY_MARKER);
        }
        write!(f, "{}", self.to_time().format("%I:%M %p"))?;
        match self.days_after() {
            days if days > 0 => write!(f, " +{}d", days),
            _ => Ok(()),
        }
    }
}

impl TryFrom<String> for Clock {
    type Error = HubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Clock::parse(&value)
    }
}

impl From<Clock> for String {
    fn from(clock: Clock) -> Self {
        clock.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("EOD", 24.0)]
    #[case("10:30AM", 10.5)]
    #[case("10:30 AM", 10.5)]
    #[case("2:15PM", 14.25)]
    #[case("9:05 am", 9.0 + 5.0 / 60.0)]
    #[case("12:00 PM", 12.0)]
    #[case("14:45", 14.75)]
    fn test_parse(#[case] input: &str, #[case] expected: f64) {
        let clock = Clock::parse(input).unwrap();
        assert!((clock.hours() - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case("")]
    #[case("noon")]
    #[case("25:00")]
    #[case("9:00 AM +xd")]
    fn test_parse_rejects_garbage(#[case] input: &str) {
        assert!(matches!(
            Clock::parse(input),
            Err(HubError::InvalidClock { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Clock::from_hours(8.0).to_string(), "08:00 AM");
        assert_eq!(Clock::from_hours(14.25).to_string(), "02:15 PM");
        assert_eq!(Clock::END_OF_DAY.to_string(), "EOD");
    }

    #[test]
    fn test_display_past_midnight_keeps_the_day() {
        let late = Clock::from_hours(23.5).advance(1.25);
        assert_eq!(late.days_after(), 1);
        assert_eq!(late.to_string(), "12:45 AM +1d");

        let back = Clock::parse(&late.to_string()).unwrap();
        assert!((back.hours() - 24.75).abs() < 1e-9);
        assert!(back > Clock::END_OF_DAY);
    }

    #[test]
    fn test_advance_rounds_to_minutes() {
        // 3 miles at 18 mph is 10 minutes
        let arrival = Clock::from_hours(8.0).advance(3.0 / 18.0);
        assert_eq!(arrival.to_string(), "08:10 AM");
    }

    #[test]
    fn test_serde_uses_text() {
        let json = serde_json::to_string(&Clock::from_hours(10.5)).unwrap();
        assert_eq!(json, "\"10:30 AM\"");
        let back: Clock = serde_json::from_str("\"EOD\"").unwrap();
        assert!(back.is_end_of_day());
    }
}
