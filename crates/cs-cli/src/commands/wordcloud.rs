//! Wordcloud command: full word-weight table for an external renderer.

use std::io::Write;

use anyhow::Result;
use cs_core::{AnalyticsEngine, Tally};
use serde::Serialize;

use super::util::{load_transcript, resolve_participant};
use crate::Config;
use crate::cli::TranscriptArgs;

#[derive(Debug, Serialize)]
pub struct WeightedWord<'a> {
    pub word: &'a str,
    pub weight: usize,
}

/// Formats word weights as a JSON array, heaviest first.
pub fn format_wordcloud_json(table: &[Tally<String>]) -> Result<String> {
    let words: Vec<WeightedWord<'_>> = table
        .iter()
        .map(|t| WeightedWord {
            word: &t.key,
            weight: t.count,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&words)?)
}

/// Runs the wordcloud command.
pub fn run<W: Write>(writer: &mut W, config: &Config, input: &TranscriptArgs) -> Result<()> {
    let messages = load_transcript(&input.file)?;
    let participant = resolve_participant(&input.participant, &messages)?;
    let engine = AnalyticsEngine::new(&messages, config.analytics()?);

    let table = engine.create_wordcloud(&participant);
    tracing::debug!(words = table.len(), "computed word weights");
    writeln!(writer, "{}", format_wordcloud_json(&table)?)?;

    Ok(())
}
