//! Report command: every analysis over one transcript.
//!
//! This module implements `chatstat report` with an optional participant
//! filter and output formats (human-readable, JSON).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use cs_core::{
    AnalyticsEngine, BusyUsers, DailyPoint, Heatmap, HourBucket, MonthlyPoint, Participant,
    Stats, Tally,
};
use serde::Serialize;

use super::stats::write_stats_lines;
use super::util::{bar, load_transcript, resolve_participant};
use crate::Config;
use crate::cli::TranscriptArgs;

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub participant: String,
    pub stats: Stats,
    pub monthly_timeline: Vec<MonthlyPoint>,
    pub daily_timeline: Vec<DailyPoint>,
    pub busiest_days: Vec<Tally<String>>,
    pub busiest_months: Vec<Tally<String>>,
    pub heatmap: Heatmap,
    /// Only present when no participant filter is applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_users: Option<BusyUsers>,
    pub common_words: Vec<Tally<String>>,
    pub emoji: Vec<Tally<String>>,
}

// ========== Report Generation ==========

/// Runs every query for one participant selection.
pub fn generate_report_data(engine: &AnalyticsEngine<'_>, participant: &Participant) -> ReportData {
    ReportData {
        participant: participant.to_string(),
        stats: engine.fetch_stats(participant),
        monthly_timeline: engine.monthly_timeline(participant),
        daily_timeline: engine.daily_timeline(participant),
        busiest_days: engine.week_activity_map(participant),
        busiest_months: engine.month_activity_map(participant),
        heatmap: engine.activity_heatmap(participant),
        // Ranking a single participant against itself is meaningless
        busy_users: participant.is_overall().then(|| engine.most_busy_users()),
        common_words: engine.most_common_words(participant),
        emoji: engine.emoji_helper(participant),
    }
}

// ========== Human-Readable Output ==========

fn section(output: &mut String, title: &str) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

/// Writes `label  count  bar` rows scaled to the largest count.
fn write_rows<'a>(output: &mut String, rows: impl IntoIterator<Item = (&'a str, usize)>) {
    let rows: Vec<(&str, usize)> = rows.into_iter().collect();
    if rows.is_empty() {
        writeln!(output, "(none)").unwrap();
        return;
    }

    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);
    for (label, count) in rows {
        writeln!(output, "{label:<20} {count:>6}  {}", bar(count, max)).unwrap();
    }
}

fn write_heatmap(output: &mut String, heatmap: &Heatmap) {
    let mut header = format!("{:<10}", "");
    for bucket in HourBucket::all() {
        write!(header, "{:>3}", bucket.hour()).unwrap();
    }
    writeln!(output, "{}", header.trim_end()).unwrap();

    for row in &heatmap.rows {
        let mut line = format!("{:<10}", row.weekday);
        for count in row.counts {
            if count == 0 {
                write!(line, "{:>3}", ".").unwrap();
            } else {
                write!(line, "{count:>3}").unwrap();
            }
        }
        writeln!(output, "{line}").unwrap();
    }
}

fn write_busy_users(output: &mut String, busy: &BusyUsers) {
    if busy.top.is_empty() {
        writeln!(output, "(none)").unwrap();
        return;
    }

    let max = busy.top.first().map_or(0, |t| t.count);
    for entry in &busy.top {
        let percent = busy
            .shares
            .iter()
            .find(|s| s.sender == entry.key)
            .map_or(0.0, |s| s.percent);
        writeln!(
            output,
            "{:<20} {:>6}  {}  {percent:>6.2}%",
            entry.key,
            entry.count,
            bar(entry.count, max)
        )
        .unwrap();
    }
}

fn tally_rows(table: &[Tally<String>]) -> impl Iterator<Item = (&str, usize)> {
    table.iter().map(|t| (t.key.as_str(), t.count))
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    let header = format!("CHAT REPORT: {}", data.participant);
    writeln!(output, "{header}").unwrap();
    writeln!(output, "{}", "═".repeat(header.chars().count())).unwrap();

    section(&mut output, "TOP STATISTICS");
    write_stats_lines(&mut output, &data.stats);

    section(&mut output, "MONTHLY TIMELINE");
    write_rows(
        &mut output,
        data.monthly_timeline
            .iter()
            .map(|p| (p.label.as_str(), p.count)),
    );

    section(&mut output, "DAILY TIMELINE");
    let dates: Vec<(String, usize)> = data
        .daily_timeline
        .iter()
        .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.count))
        .collect();
    write_rows(&mut output, dates.iter().map(|(d, c)| (d.as_str(), *c)));

    section(&mut output, "MOST BUSY DAY");
    write_rows(&mut output, tally_rows(&data.busiest_days));

    section(&mut output, "MOST BUSY MONTH");
    write_rows(&mut output, tally_rows(&data.busiest_months));

    section(&mut output, "WEEKLY ACTIVITY HEATMAP");
    write_heatmap(&mut output, &data.heatmap);

    if let Some(busy) = &data.busy_users {
        section(&mut output, "MOST BUSY USERS");
        write_busy_users(&mut output, busy);
    }

    section(&mut output, "MOST COMMON WORDS");
    write_rows(&mut output, tally_rows(&data.common_words));

    section(&mut output, "EMOJI");
    if data.emoji.is_empty() {
        writeln!(output, "No emoji found for this selection.").unwrap();
    } else {
        write_rows(&mut output, tally_rows(&data.emoji));
    }

    output
}

// ========== JSON Output ==========

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, config: &Config, input: &TranscriptArgs, json: bool) -> Result<()> {
    let messages = load_transcript(&input.file)?;
    let participant = resolve_participant(&input.participant, &messages)?;
    let engine = AnalyticsEngine::new(&messages, config.analytics()?);

    let data = generate_report_data(&engine, &participant);
    tracing::debug!(participant = %data.participant, messages = data.stats.messages, "generated report");

    if json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }

    Ok(())
}
