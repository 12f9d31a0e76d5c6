//! Transcript parser.
//!
//! Turns an exported chat transcript into an ordered list of [`Message`]s.
//!
//! # Format
//!
//! Every entry starts with a timestamp prefix such as `12/1/23, 10:05 am - `.
//! Everything up to the next prefix (or end of input) is the entry body,
//! including any continuation lines. A body of the form `Name: text` is a chat
//! message; a body without a `: ` separator on its first line is a system
//! notification.
//!
//! Parsing is all-or-nothing: a malformed timestamp or text that cannot be
//! attributed to any entry rejects the whole input.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use thiserror::Error;

use crate::message::Message;
use crate::types::Sender;

/// Space characters that exports emit in place of U+0020.
const SPACE_VARIANTS: [char; 6] = [
    '\u{00A0}', // no-break space
    '\u{2007}', // figure space
    '\u{2009}', // thin space
    '\u{200A}', // hair space
    '\u{202F}', // narrow no-break space
    '\u{205F}', // medium mathematical space
];

/// Pre-compiled regex for `D/M/Y, H:MM am - ` prefixes.
static DAY_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4}), ([0-9]{1,2}):([0-9]{2}) ?([AaPp][Mm]) - ")
        .unwrap()
});

/// Errors that reject a transcript.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No timestamp prefix was found anywhere in the input.
    #[error("not a recognized chat export: no message timestamps found")]
    EmptyInput,

    /// Some text could not be attributed to a timestamp prefix.
    #[error("found {boundaries} message timestamps but {bodies} message bodies")]
    StructuralMismatch { boundaries: usize, bodies: usize },

    /// A timestamp prefix did not describe a valid date and time.
    #[error("invalid timestamp {text:?} at byte {position}: {reason}")]
    BadTimestamp {
        position: usize,
        text: String,
        reason: &'static str,
    },
}

/// A timestamp prefix found in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Byte offset of the first character of the prefix.
    pub start: usize,
    /// Byte offset just past the prefix, where the body begins.
    pub end: usize,
    /// The parsed timestamp.
    pub timestamp: NaiveDateTime,
}

/// Locates entry boundaries for one export date layout.
///
/// Implementations must return a boundary with `end > from` or `None`,
/// so the tokenizer always makes progress.
pub trait BoundaryMatcher {
    /// Finds the first boundary starting at or after byte offset `from`.
    fn next_boundary(&self, text: &str, from: usize) -> Result<Option<Boundary>, ParseError>;
}

/// Day-first dates with a 12-hour clock: `31/12/2023, 9:41 pm - `.
///
/// Two-digit years are read as 2000-2099.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayFirstMatcher;

impl BoundaryMatcher for DayFirstMatcher {
    fn next_boundary(&self, text: &str, from: usize) -> Result<Option<Boundary>, ParseError> {
        let Some(caps) = DAY_FIRST_RE.captures_at(text, from) else {
            return Ok(None);
        };
        // Group 0 always participates in a match.
        let Some(whole) = caps.get(0) else {
            return Ok(None);
        };

        let timestamp = day_first_timestamp(&caps).map_err(|reason| ParseError::BadTimestamp {
            position: whole.start(),
            text: whole.as_str().trim_end_matches(" - ").to_string(),
            reason,
        })?;

        Ok(Some(Boundary {
            start: whole.start(),
            end: whole.end(),
            timestamp,
        }))
    }
}

fn day_first_timestamp(caps: &Captures<'_>) -> Result<NaiveDateTime, &'static str> {
    let number = |i: usize| -> Result<u32, &'static str> {
        caps[i].parse().map_err(|_| "expected a number")
    };

    let day = number(1)?;
    let month = number(2)?;
    let year = match caps[3].len() {
        2 => 2000 + number(3)?,
        4 => number(3)?,
        _ => return Err("year must have 2 or 4 digits"),
    };
    let year = i32::try_from(year).map_err(|_| "year out of range")?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or("no such calendar date")?;

    let hour = number(4)?;
    if !(1..=12).contains(&hour) {
        return Err("hour must be between 1 and 12");
    }
    let minute = number(5)?;
    let pm = caps[6].eq_ignore_ascii_case("pm");
    let hour = hour % 12 + if pm { 12 } else { 0 };
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or("minute must be between 0 and 59")?;

    Ok(date.and_time(time))
}

/// Parses transcripts with a pluggable boundary matcher.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser<M = DayFirstMatcher> {
    matcher: M,
}

impl TranscriptParser {
    /// Creates a parser for the default day-first export layout.
    pub const fn new() -> Self {
        Self {
            matcher: DayFirstMatcher,
        }
    }
}

impl<M: BoundaryMatcher> TranscriptParser<M> {
    pub const fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Parses a raw transcript into records in transcript order.
    pub fn parse(&self, raw: &str) -> Result<Vec<Message>, ParseError> {
        let text = normalize(raw);
        let boundaries = self.boundaries(&text)?;

        let Some(first) = boundaries.first() else {
            return Err(ParseError::EmptyInput);
        };

        // Text before the first prefix is a body that belongs to no entry.
        let orphaned = usize::from(!text[..first.start].trim().is_empty());
        let bodies = boundaries.len() + orphaned;
        if bodies != boundaries.len() {
            return Err(ParseError::StructuralMismatch {
                boundaries: boundaries.len(),
                bodies,
            });
        }

        let messages: Vec<Message> = boundaries
            .iter()
            .enumerate()
            .map(|(i, boundary)| {
                let body_end = boundaries.get(i + 1).map_or(text.len(), |next| next.start);
                let body = &text[boundary.end..body_end];
                let body = body.strip_suffix('\n').unwrap_or(body);
                let (sender, content) = split_sender(body);
                Message::new(boundary.timestamp, sender, content)
            })
            .collect();

        let notifications = messages
            .iter()
            .filter(|m| m.sender.is_notification())
            .count();
        tracing::debug!(
            records = messages.len(),
            notifications,
            "parsed transcript"
        );

        Ok(messages)
    }

    /// Scans the whole text for boundaries, in order.
    fn boundaries(&self, text: &str) -> Result<Vec<Boundary>, ParseError> {
        let mut boundaries = Vec::new();
        let mut cursor = 0;
        while let Some(boundary) = self.matcher.next_boundary(text, cursor)? {
            cursor = boundary.end;
            boundaries.push(boundary);
        }
        Ok(boundaries)
    }
}

/// Parses a transcript in the default export layout.
pub fn parse(raw: &str) -> Result<Vec<Message>, ParseError> {
    TranscriptParser::new().parse(raw)
}

/// Unifies space variants and line endings.
fn normalize(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    raw.replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            c if SPACE_VARIANTS.contains(&c) => ' ',
            c => c,
        })
        .collect()
}

/// Splits `Name: text` into sender and text.
///
/// The first colon anywhere in the body that is followed by whitespace and
/// preceded by at least one character is the separator. Everything after it
/// is kept verbatim.
fn split_sender(body: &str) -> (Sender, &str) {
    for (idx, _) in body.match_indices(':') {
        if idx == 0 {
            continue;
        }
        let rest = &body[idx + 1..];
        if let Some(ws) = rest.chars().next().filter(|c| c.is_whitespace()) {
            let name = &body[..idx];
            return (Sender::User(name.to_string()), &rest[ws.len_utf8()..]);
        }
    }

    (Sender::GroupNotification, body)
}
