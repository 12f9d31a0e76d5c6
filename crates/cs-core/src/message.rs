//! Parsed transcript entries.

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::types::{HourBucket, Sender};

/// Weekdays in calendar order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One transcript entry: a chat message or a system notification.
///
/// Calendar fields are derived from `timestamp` once, when the record is
/// created, and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// When the entry was sent (naive local time, minute resolution).
    pub timestamp: NaiveDateTime,
    /// Author, or the notification sentinel.
    pub sender: Sender,
    /// Body with the sender prefix removed. May span several lines.
    pub text: String,

    pub only_date: NaiveDate,
    pub year: i32,
    pub month_num: u32,
    pub month_name: &'static str,
    pub day: u32,
    pub day_name: &'static str,
    #[serde(skip)]
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
    pub hour_bucket: HourBucket,
}

impl Message {
    /// Builds a record and populates its derived calendar fields.
    pub fn new(timestamp: NaiveDateTime, sender: Sender, text: impl Into<String>) -> Self {
        let weekday = timestamp.weekday();
        Self {
            timestamp,
            sender,
            text: text.into(),
            only_date: timestamp.date(),
            year: timestamp.year(),
            month_num: timestamp.month(),
            month_name: month_name(timestamp.month()),
            day: timestamp.day(),
            day_name: weekday_name(weekday),
            weekday,
            hour: timestamp.hour(),
            minute: timestamp.minute(),
            hour_bucket: HourBucket::of(&timestamp),
        }
    }
}

/// Full English month name for a 1-based month number.
pub fn month_name(month_num: u32) -> &'static str {
    u8::try_from(month_num)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("Unknown", |m| m.name())
}

/// Full English weekday name.
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
