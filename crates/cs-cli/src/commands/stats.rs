//! Stats command: message, word, media and link counts.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use cs_core::{AnalyticsEngine, Stats};
use serde::Serialize;

use super::util::{load_transcript, resolve_participant};
use crate::Config;
use crate::cli::TranscriptArgs;

/// JSON stats structure.
#[derive(Debug, Serialize)]
pub struct JsonStats<'a> {
    pub participant: &'a str,
    #[serde(flatten)]
    pub stats: &'a Stats,
}

/// Writes the four counts as labelled lines.
pub fn write_stats_lines(output: &mut String, stats: &Stats) {
    writeln!(output, "Messages:     {}", stats.messages).unwrap();
    writeln!(output, "Words:        {}", stats.words).unwrap();
    writeln!(output, "Media shared: {}", stats.media).unwrap();
    writeln!(output, "Links shared: {}", stats.links).unwrap();
}

/// Formats the human-readable stats output.
pub fn format_stats(participant: &str, stats: &Stats) -> String {
    let mut output = String::new();
    let header = format!("STATS: {participant}");
    writeln!(output, "{header}").unwrap();
    writeln!(output, "{}", "─".repeat(header.chars().count())).unwrap();
    write_stats_lines(&mut output, stats);
    output
}

/// Formats stats as JSON.
pub fn format_stats_json(participant: &str, stats: &Stats) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonStats { participant, stats })?)
}

/// Runs the stats command.
pub fn run<W: Write>(writer: &mut W, config: &Config, input: &TranscriptArgs, json: bool) -> Result<()> {
    let messages = load_transcript(&input.file)?;
    let participant = resolve_participant(&input.participant, &messages)?;
    let engine = AnalyticsEngine::new(&messages, config.analytics()?);

    let stats = engine.fetch_stats(&participant);
    let label = participant.to_string();

    if json {
        writeln!(writer, "{}", format_stats_json(&label, &stats)?)?;
    } else {
        write!(writer, "{}", format_stats(&label, &stats))?;
    }

    Ok(())
}
