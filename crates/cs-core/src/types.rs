//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sender value used for system entries that have no human author.
pub const NOTIFICATION_SENDER: &str = "group_notification";

/// Participant selector value meaning "no filtering".
pub const OVERALL: &str = "Overall";

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The hour was outside `0..=23`.
    #[error("hour must be between 0 and 23, got {hour}")]
    HourOutOfRange { hour: u32 },
}

/// Who wrote a transcript entry.
///
/// System entries (joins, leaves, encryption notices) carry no author and are
/// represented by [`Sender::GroupNotification`] rather than an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sender {
    /// A named chat participant.
    User(String),
    /// A system notification.
    GroupNotification,
}

impl Sender {
    /// Creates a user sender after validation.
    pub fn user(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "sender" });
        }
        Ok(Self::User(name))
    }

    /// Returns the sender as it appears in output.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(name) => name,
            Self::GroupNotification => NOTIFICATION_SENDER,
        }
    }

    pub const fn is_notification(&self) -> bool {
        matches!(self, Self::GroupNotification)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NOTIFICATION_SENDER {
            Ok(Self::GroupNotification)
        } else {
            Self::user(s)
        }
    }
}

impl Serialize for Sender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One-hour window of the day, labelled so that the 24 windows sort and
/// display without a discontinuity at midnight.
///
/// Hour 23 is labelled `23-00`, hour 0 is `00-1`, every other hour `h` is
/// `h-(h+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourBucket(u8);

impl HourBucket {
    /// Number of buckets in a day.
    pub const COUNT: usize = 24;

    /// Creates the bucket containing `hour`.
    pub fn new(hour: u32) -> Result<Self, ValidationError> {
        u8::try_from(hour)
            .ok()
            .filter(|h| usize::from(*h) < Self::COUNT)
            .map(Self)
            .ok_or(ValidationError::HourOutOfRange { hour })
    }

    /// The bucket containing a clock time.
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(time: &impl Timelike) -> Self {
        // hour() is always 0..=23
        Self(time.hour() as u8)
    }

    /// All buckets, midnight first.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..24).map(Self)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0)
    }

    /// Column index of this bucket in a day-long grid.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Label for display and serialization.
    pub fn label(self) -> String {
        match self.0 {
            23 => "23-00".to_string(),
            0 => "00-1".to_string(),
            h => format!("{h}-{}", h + 1),
        }
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for HourBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

/// Which records an analytics query looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Participant {
    /// Every record, notifications included.
    #[default]
    Overall,
    /// Only records written by this sender.
    Only(Sender),
}

impl Participant {
    /// Returns true if records from `sender` are selected.
    pub fn matches(&self, sender: &Sender) -> bool {
        match self {
            Self::Overall => true,
            Self::Only(selected) => selected == sender,
        }
    }

    pub const fn is_overall(&self) -> bool {
        matches!(self, Self::Overall)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overall => f.write_str(OVERALL),
            Self::Only(sender) => write!(f, "{sender}"),
        }
    }
}

/// `"Overall"` always parses to [`Participant::Overall`], so a sender whose
/// name is literally `Overall` is only reachable as `Participant::Only`
/// built directly, never through this impl.
impl FromStr for Participant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == OVERALL {
            Ok(Self::Overall)
        } else {
            s.parse().map(Self::Only)
        }
    }
}
