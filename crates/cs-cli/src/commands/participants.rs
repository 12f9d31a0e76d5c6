//! Participants command: per-sender counts.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use cs_core::{AnalyticsEngine, Stats};
use serde::Serialize;

use super::util::load_transcript;
use crate::Config;

/// One participant row.
#[derive(Debug, Serialize)]
pub struct ParticipantRow {
    pub name: String,
    #[serde(flatten)]
    pub stats: Stats,
}

/// Collects one row per participant, sorted by name.
pub fn collect_rows(engine: &AnalyticsEngine<'_>) -> Vec<ParticipantRow> {
    engine
        .participant_stats()
        .into_iter()
        .map(|(name, stats)| ParticipantRow { name, stats })
        .collect()
}

/// Formats participants as an aligned table.
pub fn format_participants(rows: &[ParticipantRow]) -> String {
    if rows.is_empty() {
        return "No participants found.\n".to_string();
    }

    let width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("PARTICIPANT".len());

    let mut output = String::new();
    writeln!(
        output,
        "{:<width$}  {:>8}  {:>8}  {:>6}  {:>6}",
        "PARTICIPANT", "MESSAGES", "WORDS", "MEDIA", "LINKS"
    )
    .unwrap();
    for row in rows {
        writeln!(
            output,
            "{:<width$}  {:>8}  {:>8}  {:>6}  {:>6}",
            row.name, row.stats.messages, row.stats.words, row.stats.media, row.stats.links
        )
        .unwrap();
    }
    output
}

/// Runs the participants command.
pub fn run<W: Write>(writer: &mut W, config: &Config, file: &Path, json: bool) -> Result<()> {
    let messages = load_transcript(file)?;
    let engine = AnalyticsEngine::new(&messages, config.analytics()?);
    let rows = collect_rows(&engine);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        write!(writer, "{}", format_participants(&rows))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::AnalyticsConfig;
    use insta::assert_snapshot;

    const TRANSCRIPT: &str = "1/3/24, 8:00 am - Zoe: morning all\n\
                              1/3/24, 8:01 am - Zoe added Maximilian\n\
                              1/3/24, 8:02 am - Maximilian: hey https://example.com\n\
                              1/3/24, 8:03 am - Zoe: <Media omitted>\n";

    fn rows() -> Vec<ParticipantRow> {
        let messages = cs_core::parse(TRANSCRIPT).unwrap();
        let engine = AnalyticsEngine::new(&messages, AnalyticsConfig::default());
        collect_rows(&engine)
    }

    #[test]
    fn test_rows_sorted_and_exclude_notifications() {
        let rows = rows();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Maximilian", "Zoe"]);
        assert_eq!(rows[1].stats.messages, 2);
        assert_eq!(rows[1].stats.media, 1);
    }

    #[test]
    fn test_participants_table() {
        assert_snapshot!(format_participants(&rows()), @r"
        PARTICIPANT  MESSAGES     WORDS   MEDIA   LINKS
        Maximilian          1         2       0       1
        Zoe                 2         2       1       0
        ");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_participants(&[]), "No participants found.\n");
    }

    #[test]
    fn test_participants_json() {
        let json = serde_json::to_value(rows()).unwrap();
        assert_eq!(json[0]["name"], "Maximilian");
        assert_eq!(json[0]["links"], 1);
        assert_eq!(json[1]["media"], 1);
    }
}
