//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use cs_core::{Message, Participant};

/// Reads and parses a transcript file.
pub fn load_transcript(path: &Path) -> Result<Vec<Message>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    let messages = cs_core::parse(&raw)
        .with_context(|| format!("failed to parse transcript {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = messages.len(), "loaded transcript");
    Ok(messages)
}

/// Resolves a `--participant` value against the senders in the transcript.
pub fn resolve_participant(name: &str, messages: &[Message]) -> Result<Participant> {
    let participant: Participant = name
        .parse()
        .with_context(|| format!("invalid participant {name:?}"))?;

    if let Participant::Only(sender) = &participant {
        if !messages.iter().any(|m| &m.sender == sender) {
            anyhow::bail!("no messages from {name:?} in this transcript");
        }
    }

    Ok(participant)
}

/// Generates a 10-character bar proportional to `value / max`.
/// Values under 5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn bar(value: usize, max: usize) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
