//! Core domain logic for chat transcript analysis.
//!
//! This crate contains:
//! - Parsing: turning an exported transcript into ordered message records
//! - Analytics: volume, timeline, activity, ranking and lexical queries
//! - Stop words: configurable word lists for frequency tables

pub mod aggregate;
mod analytics;
pub mod message;
pub mod parser;
mod stop_words;
pub mod text;
pub mod types;

pub use aggregate::{BusyUsers, DailyPoint, Heatmap, HeatmapRow, MonthlyPoint, Share, Stats, Tally};
pub use analytics::{AnalyticsConfig, AnalyticsEngine, DEFAULT_MEDIA_PLACEHOLDER};
pub use message::Message;
pub use parser::{BoundaryMatcher, DayFirstMatcher, ParseError, TranscriptParser, parse};
pub use stop_words::StopWords;
pub use types::{HourBucket, NOTIFICATION_SENDER, OVERALL, Participant, Sender, ValidationError};
