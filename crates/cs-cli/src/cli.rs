//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Chat transcript analyzer.
///
/// Parses an exported chat transcript and reports message volume, activity
/// timelines, busiest participants and word, emoji and link usage.
#[derive(Debug, Parser)]
#[command(name = "chatstat", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show message, word, media and link counts.
    Stats {
        #[command(flatten)]
        input: TranscriptArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run every analysis and print a full report.
    Report {
        #[command(flatten)]
        input: TranscriptArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List participants with their counts.
    Participants {
        /// Exported chat transcript.
        file: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the full word-frequency table as JSON for a word-cloud renderer.
    Wordcloud {
        #[command(flatten)]
        input: TranscriptArgs,
    },
}

/// Transcript file and participant selection shared by analysis commands.
#[derive(Debug, Clone, Args)]
pub struct TranscriptArgs {
    /// Exported chat transcript.
    pub file: PathBuf,

    /// Restrict the analysis to one participant ("Overall" for everyone).
    ///
    /// "Overall" is reserved: a participant with that exact name cannot be
    /// selected on its own.
    #[arg(short, long, default_value = cs_core::OVERALL)]
    pub participant: String,
}
