//! Value objects returned by analytics queries.
//!
//! Every aggregate is an explicit ordered sequence; the sort key of each is
//! documented on the type since it often differs from the display label.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use crate::message::{WEEK, weekday_name};
use crate::types::HourBucket;

/// Volume statistics for a selection of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub messages: usize,
    pub words: usize,
    pub media: usize,
    pub links: usize,
}

impl std::ops::Add for Stats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            messages: self.messages + other.messages,
            words: self.words + other.words,
            media: self.media + other.media,
            links: self.links + other.links,
        }
    }
}

impl std::iter::Sum for Stats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

/// One row of a category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally<K> {
    pub key: K,
    pub count: usize,
}

/// Messages in one calendar month.
///
/// Series are sorted by `(year, month_num)`, not by `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month_num: u32,
    /// `MonthName-Year`, e.g. `December-2021`.
    pub label: String,
    pub count: usize,
}

/// Messages on one calendar date. Series are sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Message counts for one weekday, one cell per hour bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub weekday: &'static str,
    pub counts: [usize; HourBucket::COUNT],
}

/// Dense weekday by hour-bucket matrix.
///
/// Rows run Monday to Sunday and columns follow [`HourBucket::all`]. Every
/// cell is present; combinations with no messages hold zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub columns: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

impl Heatmap {
    /// An all-zero matrix.
    pub fn empty() -> Self {
        Self {
            columns: HourBucket::all().map(HourBucket::label).collect(),
            rows: WEEK
                .iter()
                .map(|&day| HeatmapRow {
                    weekday: weekday_name(day),
                    counts: [0; HourBucket::COUNT],
                })
                .collect(),
        }
    }

    /// Count for a weekday name and bucket; zero for unknown weekdays.
    pub fn cell(&self, weekday: &str, bucket: HourBucket) -> usize {
        self.rows
            .iter()
            .find(|row| row.weekday == weekday)
            .map_or(0, |row| row.counts[bucket.index()])
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|row| row.counts.iter()).sum()
    }
}

/// A sender's share of all participant messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub sender: String,
    /// Percentage rounded to two decimals.
    pub percent: f64,
}

/// Participant ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusyUsers {
    /// Most active senders, descending by message count.
    pub top: Vec<Tally<String>>,
    /// Every sender's share, in the same order.
    pub shares: Vec<Share>,
}

/// Counts keys into a table sorted by descending count.
///
/// Keys with equal counts keep the order in which they were first seen.
pub fn tally<K, I>(keys: I) -> Vec<Tally<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut table: Vec<Tally<K>> = Vec::new();

    for key in keys {
        if let Some(&i) = index.get(&key) {
            table[i].count += 1;
        } else {
            index.insert(key.clone(), table.len());
            table.push(Tally { key, count: 1 });
        }
    }

    // Stable sort keeps first-seen order among ties
    table.sort_by_key(|t| Reverse(t.count));
    table
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
