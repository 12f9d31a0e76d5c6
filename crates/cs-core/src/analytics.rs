//! Analytics over parsed transcripts.
//!
//! [`AnalyticsEngine`] borrows an immutable slice of records and answers
//! independent queries over it. Each query takes a [`Participant`] selector,
//! applies it as a predicate on the sender and aggregates what remains;
//! no query depends on another's result.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::aggregate::{
    BusyUsers, DailyPoint, Heatmap, MonthlyPoint, Share, Stats, Tally, round2, tally,
};
use crate::message::{Message, month_name};
use crate::stop_words::StopWords;
use crate::text;
use crate::types::{Participant, Sender};

/// Placeholder text that exports substitute for attachments.
pub const DEFAULT_MEDIA_PLACEHOLDER: &str = "<Media omitted>";

/// Configuration for analytics queries.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Words left out of word frequency tables.
    pub stop_words: StopWords,

    /// Exact message text that marks an omitted attachment.
    /// Default: `<Media omitted>`.
    pub media_placeholder: String,

    /// Rows returned by [`AnalyticsEngine::most_common_words`]. Default: 20.
    pub common_words_limit: usize,

    /// Rows in [`BusyUsers::top`]. Default: 5.
    pub busy_users_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::builtin(),
            media_placeholder: DEFAULT_MEDIA_PLACEHOLDER.to_string(),
            common_words_limit: 20,
            busy_users_limit: 5,
        }
    }
}

/// Read-only queries over a parsed transcript.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<'a> {
    messages: &'a [Message],
    config: AnalyticsConfig,
}

impl<'a> AnalyticsEngine<'a> {
    pub const fn new(messages: &'a [Message], config: AnalyticsConfig) -> Self {
        Self { messages, config }
    }

    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// All records, in transcript order.
    pub const fn messages(&self) -> &'a [Message] {
        self.messages
    }

    fn selected<'s>(&'s self, participant: &'s Participant) -> impl Iterator<Item = &'a Message> + 's {
        self.messages
            .iter()
            .filter(move |m| participant.matches(&m.sender))
    }

    fn is_media(&self, message: &Message) -> bool {
        message.text == self.config.media_placeholder
    }

    /// Message, word, media and link counts.
    ///
    /// Media placeholders count as messages and media but contribute no
    /// words. Links are counted per occurrence, not per message.
    pub fn fetch_stats(&self, participant: &Participant) -> Stats {
        self.selected(participant)
            .map(|m| {
                let media = self.is_media(m);
                Stats {
                    messages: 1,
                    words: if media { 0 } else { text::words(&m.text).count() },
                    media: usize::from(media),
                    links: text::count_links(&m.text),
                }
            })
            .sum()
    }

    /// Messages per calendar month, oldest first.
    pub fn monthly_timeline(&self, participant: &Participant) -> Vec<MonthlyPoint> {
        let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for m in self.selected(participant) {
            *months.entry((m.year, m.month_num)).or_default() += 1;
        }

        months
            .into_iter()
            .map(|((year, month_num), count)| MonthlyPoint {
                year,
                month_num,
                label: format!("{}-{year}", month_name(month_num)),
                count,
            })
            .collect()
    }

    /// Messages per calendar date, oldest first.
    pub fn daily_timeline(&self, participant: &Participant) -> Vec<DailyPoint> {
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for m in self.selected(participant) {
            *days.entry(m.only_date).or_default() += 1;
        }

        days.into_iter()
            .map(|(date, count)| DailyPoint { date, count })
            .collect()
    }

    /// Messages per weekday name, busiest first.
    pub fn week_activity_map(&self, participant: &Participant) -> Vec<Tally<String>> {
        tally(self.selected(participant).map(|m| m.day_name.to_string()))
    }

    /// Messages per month name across all years, busiest first.
    pub fn month_activity_map(&self, participant: &Participant) -> Vec<Tally<String>> {
        tally(self.selected(participant).map(|m| m.month_name.to_string()))
    }

    /// Weekday by hour-bucket message counts.
    pub fn activity_heatmap(&self, participant: &Participant) -> Heatmap {
        let mut heatmap = Heatmap::empty();
        for m in self.selected(participant) {
            let row = m.weekday.num_days_from_monday() as usize;
            heatmap.rows[row].counts[m.hour_bucket.index()] += 1;
        }
        heatmap
    }

    /// Ranks participants by message count over the whole transcript.
    ///
    /// Notifications are not participants and are left out of both the
    /// ranking and the share denominator. Only meaningful without a
    /// participant filter, so it takes none.
    #[allow(clippy::cast_precision_loss)]
    pub fn most_busy_users(&self) -> BusyUsers {
        let counts = tally(self.messages.iter().filter_map(|m| match &m.sender {
            Sender::User(name) => Some(name.clone()),
            Sender::GroupNotification => None,
        }));
        let total: usize = counts.iter().map(|t| t.count).sum();

        let shares = counts
            .iter()
            .map(|t| Share {
                sender: t.key.clone(),
                percent: round2(t.count as f64 / total as f64 * 100.0),
            })
            .collect();
        let top = counts
            .into_iter()
            .take(self.config.busy_users_limit)
            .collect();

        BusyUsers { top, shares }
    }

    /// Lower-cased words from chat messages, minus stop words.
    fn filtered_words<'s>(&'s self, participant: &'s Participant) -> impl Iterator<Item = String> + 's {
        self.selected(participant)
            .filter(move |m| !m.sender.is_notification() && !self.is_media(m))
            .flat_map(|m| text::words(&m.text))
            .map(str::to_lowercase)
            .filter(move |w| !self.config.stop_words.contains(w))
    }

    /// Most frequent words, ties in first-seen order.
    pub fn most_common_words(&self, participant: &Participant) -> Vec<Tally<String>> {
        let mut table = tally(self.filtered_words(participant));
        table.truncate(self.config.common_words_limit);
        table
    }

    /// Emoji frequencies, most used first. Empty when there are none.
    pub fn emoji_helper(&self, participant: &Participant) -> Vec<Tally<String>> {
        tally(
            self.selected(participant)
                .flat_map(|m| text::emoji_graphemes(&m.text))
                .map(str::to_string),
        )
    }

    /// Word weights for cloud layout: same filtering as
    /// [`most_common_words`](Self::most_common_words) without truncation.
    pub fn create_wordcloud(&self, participant: &Participant) -> Vec<Tally<String>> {
        tally(self.filtered_words(participant))
    }

    /// Distinct participant names, sorted. Notifications are excluded.
    pub fn participants(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter_map(|m| match &m.sender {
                Sender::User(name) => Some(name.as_str()),
                Sender::GroupNotification => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// [`fetch_stats`](Self::fetch_stats) for every participant, in
    /// [`participants`](Self::participants) order.
    pub fn participant_stats(&self) -> Vec<(String, Stats)> {
        self.participants()
            .into_par_iter()
            .map(|name| {
                let selector = Participant::Only(Sender::User(name.clone()));
                let stats = self.fetch_stats(&selector);
                (name, stats)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::parser::parse;
    use crate::types::HourBucket;

    const SCENARIO: &str = "12/1/23, 10:05 am - Alice: Hello there\n\
                            12/1/23, 10:06 am - Bob: Hi!\n\
                            12/1/23, 10:07 am - Alice joined using this group's invite link\n";

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn msg(ts: &str, sender: &str, text: &str) -> Message {
        Message::new(at(ts), sender.parse().unwrap(), text)
    }

    fn bare_config() -> AnalyticsConfig {
        AnalyticsConfig {
            stop_words: StopWords::default(),
            ..AnalyticsConfig::default()
        }
    }

    fn only(name: &str) -> Participant {
        name.parse().unwrap()
    }

    #[test]
    fn stats_for_scenario_transcript() {
        let messages = parse(SCENARIO).unwrap();
        let engine = AnalyticsEngine::new(&messages, AnalyticsConfig::default());

        assert_eq!(
            engine.fetch_stats(&Participant::Overall),
            Stats {
                messages: 3,
                words: 9,
                media: 0,
                links: 0,
            }
        );
    }

    #[test]
    fn media_placeholder_counts_as_message_not_words() {
        let messages = vec![
            msg("2023-01-12 10:00", "Alice", "<Media omitted>"),
            msg("2023-01-12 10:01", "Alice", "look at this"),
            msg("2023-01-12 10:02", "Alice", "I said <Media omitted> twice"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let stats = engine.fetch_stats(&Participant::Overall);

        assert_eq!(stats.messages, 3);
        assert_eq!(stats.media, 1);
        assert_eq!(stats.words, 3 + 5);

        let words: Vec<String> = engine
            .most_common_words(&Participant::Overall)
            .into_iter()
            .map(|t| t.key)
            .collect();
        let first: Vec<&str> = words.iter().take(3).map(String::as_str).collect();
        assert_eq!(first, vec!["look", "at", "this"]);
    }

    #[test]
    fn counts_links_per_occurrence() {
        let messages = vec![
            msg("2023-01-12 10:00", "Alice", "https://a.com and https://b.com"),
            msg("2023-01-12 10:01", "Bob", "www.example.org"),
            msg("2023-01-12 10:02", "Bob", "no link"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        assert_eq!(engine.fetch_stats(&Participant::Overall).links, 3);
        assert_eq!(engine.fetch_stats(&only("Alice")).links, 2);
    }

    #[test]
    fn word_count_matches_whitespace_split() {
        let texts = ["one two three", "  four\tfive ", "six\nseven eight nine"];
        let messages: Vec<Message> = texts
            .iter()
            .map(|t| msg("2023-05-01 09:00", "Alice", t))
            .collect();
        let engine = AnalyticsEngine::new(&messages, bare_config());

        let expected: usize = texts.iter().map(|t| t.split_whitespace().count()).sum();
        assert_eq!(engine.fetch_stats(&Participant::Overall).words, expected);
    }

    #[test]
    fn per_sender_stats_sum_to_overall() {
        let messages = vec![
            msg("2023-01-12 10:00", "Alice", "hi https://x.io"),
            msg("2023-01-12 10:01", "Bob", "<Media omitted>"),
            msg("2023-01-12 10:02", "group_notification", "Carol left"),
            msg("2023-01-12 10:03", "Carol", "one two three"),
            msg("2023-01-12 10:04", "Alice", "bye www.y.com"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        let overall = engine.fetch_stats(&Participant::Overall);
        let per_user: Stats = engine.participant_stats().into_iter().map(|(_, s)| s).sum();
        let notifications = engine.fetch_stats(&Participant::Only(Sender::GroupNotification));

        assert_eq!(per_user + notifications, overall);
        assert_eq!(overall.messages, 5);
        assert_eq!(overall.media, 1);
        assert_eq!(overall.links, 2);
    }

    #[test]
    fn monthly_timeline_orders_across_year_boundary() {
        let messages = vec![
            msg("2022-01-03 10:00", "Alice", "new year"),
            msg("2021-12-30 10:00", "Alice", "old year"),
            msg("2021-12-31 10:00", "Bob", "eve"),
            msg("2022-04-01 10:00", "Bob", "april"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let timeline = engine.monthly_timeline(&Participant::Overall);

        let labels: Vec<(&str, usize)> = timeline
            .iter()
            .map(|p| (p.label.as_str(), p.count))
            .collect();
        assert_eq!(
            labels,
            vec![("December-2021", 2), ("January-2022", 1), ("April-2022", 1)]
        );
    }

    #[test]
    fn daily_timeline_counts_per_date() {
        let messages = vec![
            msg("2023-03-02 10:00", "Alice", "a"),
            msg("2023-03-01 23:59", "Bob", "b"),
            msg("2023-03-02 11:00", "Bob", "c"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let timeline = engine.daily_timeline(&Participant::Overall);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date.to_string(), "2023-03-01");
        assert_eq!(timeline[0].count, 1);
        assert_eq!(timeline[1].count, 2);

        let bob = engine.daily_timeline(&only("Bob"));
        assert_eq!(bob.iter().map(|p| p.count).sum::<usize>(), 2);
    }

    #[test]
    fn week_and_month_maps_group_by_name() {
        let messages = vec![
            // Jan 2 2023 and Jan 9 2023 are Mondays; Jan 3 2024 is a Wednesday
            msg("2023-01-02 10:00", "Alice", "a"),
            msg("2023-01-09 10:00", "Alice", "b"),
            msg("2024-01-03 10:00", "Alice", "c"),
            msg("2024-02-07 10:00", "Alice", "d"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        let days = engine.week_activity_map(&Participant::Overall);
        assert_eq!(days[0].key, "Monday");
        assert_eq!(days[0].count, 2);
        assert_eq!(days[1].key, "Wednesday");
        assert_eq!(days[1].count, 2);

        let months = engine.month_activity_map(&Participant::Overall);
        assert_eq!(
            months,
            vec![
                Tally {
                    key: "January".to_string(),
                    count: 3
                },
                Tally {
                    key: "February".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn heatmap_places_monday_late_night_message() {
        // Jan 2 2023 is a Monday
        let messages = vec![msg("2023-01-02 23:15", "Alice", "late")];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let heatmap = engine.activity_heatmap(&Participant::Overall);

        let late = HourBucket::new(23).unwrap();
        assert_eq!(heatmap.cell("Monday", late), 1);
        assert_eq!(heatmap.total(), 1);
        assert_eq!(heatmap.rows.len(), 7);
        assert!(heatmap.rows.iter().all(|row| row.counts.len() == 24));
        assert_eq!(heatmap.columns[late.index()], "23-00");
    }

    #[test]
    fn heatmap_respects_participant_filter() {
        let messages = vec![
            msg("2023-01-02 00:30", "Alice", "a"),
            msg("2023-01-03 00:30", "Bob", "b"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let heatmap = engine.activity_heatmap(&only("Bob"));

        let midnight = HourBucket::new(0).unwrap();
        assert_eq!(heatmap.cell("Monday", midnight), 0);
        assert_eq!(heatmap.cell("Tuesday", midnight), 1);
    }

    #[test]
    fn busy_users_exclude_notifications() {
        let messages = vec![
            msg("2023-01-12 10:00", "group_notification", "X joined"),
            msg("2023-01-12 10:01", "group_notification", "Y joined"),
            msg("2023-01-12 10:02", "group_notification", "Z joined"),
            msg("2023-01-12 10:03", "Bob", "a"),
            msg("2023-01-12 10:04", "Alice", "b"),
            msg("2023-01-12 10:05", "Alice", "c"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let busy = engine.most_busy_users();

        let top: Vec<(&str, usize)> = busy.top.iter().map(|t| (t.key.as_str(), t.count)).collect();
        assert_eq!(top, vec![("Alice", 2), ("Bob", 1)]);

        assert_eq!(busy.shares.len(), 2);
        assert_eq!(busy.shares[0].sender, "Alice");
        assert!((busy.shares[0].percent - 66.67).abs() < 1e-9);
        assert!((busy.shares[1].percent - 33.33).abs() < 1e-9);
    }

    #[test]
    fn busy_users_top_is_limited() {
        let messages: Vec<Message> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|name| msg("2023-01-12 10:00", name, "x"))
            .collect();
        let config = AnalyticsConfig {
            busy_users_limit: 3,
            ..bare_config()
        };
        let engine = AnalyticsEngine::new(&messages, config);
        let busy = engine.most_busy_users();

        assert_eq!(busy.top.len(), 3);
        assert_eq!(busy.shares.len(), 7);
        let keys: Vec<&str> = busy.top.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn common_words_filter_and_rank() {
        let messages = vec![
            msg("2023-01-12 10:00", "Alice", "The cat and the Dog"),
            msg("2023-01-12 10:01", "Bob", "dog DOG cat"),
            msg("2023-01-12 10:02", "group_notification", "dog dog dog joined"),
            msg("2023-01-12 10:03", "Bob", "<Media omitted>"),
        ];
        let config = AnalyticsConfig {
            stop_words: ["the", "and"].into_iter().collect(),
            ..AnalyticsConfig::default()
        };
        let engine = AnalyticsEngine::new(&messages, config);
        let words = engine.most_common_words(&Participant::Overall);

        assert_eq!(
            words,
            vec![
                Tally {
                    key: "dog".to_string(),
                    count: 3
                },
                Tally {
                    key: "cat".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn common_words_ties_keep_first_seen_order() {
        let messages = vec![msg("2023-01-12 10:00", "Alice", "zeta alpha mu alpha zeta mu")];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        let keys: Vec<String> = engine
            .most_common_words(&Participant::Overall)
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn common_words_are_truncated_but_wordcloud_is_not() {
        let text: Vec<String> = (0..30).map(|i| format!("w{i}")).collect();
        let messages = vec![msg("2023-01-12 10:00", "Alice", &text.join(" "))];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        assert_eq!(engine.most_common_words(&Participant::Overall).len(), 20);
        assert_eq!(engine.create_wordcloud(&Participant::Overall).len(), 30);
    }

    #[test]
    fn wordcloud_skips_notifications_and_media() {
        let messages = vec![
            msg("2023-01-12 10:00", "group_notification", "Alice joined"),
            msg("2023-01-12 10:01", "Alice", "<Media omitted>"),
            msg("2023-01-12 10:02", "Alice", "sunny day"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());
        let cloud = engine.create_wordcloud(&Participant::Overall);

        let keys: Vec<&str> = cloud.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["sunny", "day"]);
    }

    #[test]
    fn emoji_table_counts_occurrences() {
        let messages = vec![
            msg("2023-01-12 10:00", "Alice", "great 🎉🎉"),
            msg("2023-01-12 10:01", "Bob", "😀 and 🎉"),
        ];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        assert_eq!(
            engine.emoji_helper(&Participant::Overall),
            vec![
                Tally {
                    key: "🎉".to_string(),
                    count: 3
                },
                Tally {
                    key: "😀".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(engine.emoji_helper(&only("Bob")).len(), 2);
    }

    #[test]
    fn emoji_presentation_variants_tally_together() {
        let messages = vec![msg("2023-01-12 10:00", "Alice", "❤ ❤\u{fe0f}")];
        let engine = AnalyticsEngine::new(&messages, bare_config());

        assert_eq!(
            engine.emoji_helper(&Participant::Overall),
            vec![Tally {
                key: "❤\u{fe0f}".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn emoji_table_is_empty_without_emoji() {
        let messages = parse(SCENARIO).unwrap();
        let engine = AnalyticsEngine::new(&messages, bare_config());
        assert!(engine.emoji_helper(&Participant::Overall).is_empty());
    }

    #[test]
    fn participants_are_sorted_and_exclude_notifications() {
        let messages = parse(SCENARIO).unwrap();
        let engine = AnalyticsEngine::new(&messages, bare_config());
        assert_eq!(engine.participants(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn queries_do_not_mutate_records() {
        let messages = parse(SCENARIO).unwrap();
        let before = messages.clone();
        let engine = AnalyticsEngine::new(&messages, bare_config());

        let _ = engine.fetch_stats(&Participant::Overall);
        let _ = engine.most_busy_users();
        let _ = engine.create_wordcloud(&only("Alice"));

        assert_eq!(engine.messages(), before.as_slice());
    }
}
